use clap::{Parser, Subcommand};
pub use clap_complete;

use syspath::ResolverOptions;

#[derive(Parser)]
#[command(
    name = "syspath",
    version,
    about = "Print the home directory and the data directory for an application"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Application name used as the last segment of the data directory
    #[arg(long, global = true)]
    pub app_name: Option<String>,

    /// Permission bits for a newly created data directory, in octal (e.g. 700)
    #[arg(long, global = true, value_parser = parse_octal)]
    pub mode: Option<u32>,

    /// Fail instead of creating a missing data directory
    #[arg(long = "no-create", global = true)]
    pub no_create: bool,

    /// Remove the data directory again on exit if it was created and is still empty
    #[arg(long = "remove-on-exit", global = true)]
    pub remove_on_exit: bool,

    /// Print the paths as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print only the home directory
    Home,
    /// Print only the data directory
    Data,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

impl Cli {
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            app_name: self.app_name.clone(),
            data_dir_mode: self.mode,
            data_dir_auto_create: Some(!self.no_create),
            data_dir_auto_remove: Some(self.remove_on_exit),
        }
    }
}

fn parse_octal(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    u32::from_str_radix(digits, 8)
        .ok()
        .filter(|mode| *mode <= 0o7777)
        .ok_or_else(|| format!("'{s}' is not an octal permission mode"))
}
