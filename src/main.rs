mod cli;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing_subscriber::prelude::*;

use cli::{Cli, Command};
use syspath::{Cleanups, ResolvedPaths};

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    if let Some(Command::Completions { shell }) = cli.command {
        generate(shell, &mut Cli::command(), "syspath", &mut io::stdout());
        return Ok(());
    }

    // Lives until the end of main so that --remove-on-exit cleanups run on return.
    let mut cleanups = Cleanups::new();
    let paths = syspath::resolve(&cli.resolver_options(), &mut cleanups)
        .context("could not resolve system paths")?;
    print_paths(&cli, &paths)
}

fn print_paths(cli: &Cli, paths: &ResolvedPaths) -> Result<()> {
    match cli.command {
        Some(Command::Home) => print_one(cli.json, "home_dir", &paths.home_dir),
        Some(Command::Data) => print_one(cli.json, "data_dir", &paths.data_dir),
        _ if cli.json => {
            println!("{}", serde_json::to_string_pretty(paths)?);
            Ok(())
        }
        _ => {
            println!("home\t{}", paths.home_dir.display());
            println!("data\t{}", paths.data_dir.display());
            Ok(())
        }
    }
}

fn print_one(json: bool, key: &str, path: &std::path::Path) -> Result<()> {
    if json {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), serde_json::to_value(path)?);
        println!("{}", serde_json::Value::Object(object));
    } else {
        println!("{}", path.display());
    }
    Ok(())
}

fn setup_tracing() {
    let env_layer = if std::env::var("SYSPATH_LOG").is_ok() {
        tracing_subscriber::EnvFilter::try_from_env("SYSPATH_LOG").ok()
    } else if cfg!(debug_assertions) {
        Some(tracing_subscriber::EnvFilter::new("syspath=info"))
    } else {
        None
    };
    if let Some(env_layer) = env_layer {
        let format_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false);
        tracing_subscriber::registry()
            .with(env_layer)
            .with(format_layer)
            .init();
    }
}
