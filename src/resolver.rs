use std::fs::DirBuilder;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::cleanup::{Cleanups, DataDirCleanup};
use crate::env::{Environment, Platform};
use crate::error::{Error, Result};
use crate::options::{ResolverOptions, Settings};

/// The two directories a successful resolve hands back. Both are absolute,
/// normalized and existed when the call returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedPaths {
    pub home_dir: PathBuf,
    pub data_dir: PathBuf,
}

pub struct PathResolver<E> {
    env: E,
}

impl<E: Environment> PathResolver<E> {
    pub fn new(env: E) -> Self {
        Self { env }
    }

    pub fn resolve(
        &self,
        options: &ResolverOptions,
        cleanups: &mut Cleanups,
    ) -> Result<ResolvedPaths> {
        let settings = options.settle(&self.env);
        self.resolve_with(&settings, cleanups)
    }

    /// Resolve both directories, creating the data directory if allowed.
    /// A created directory is registered in `cleanups` when
    /// `data_dir_auto_remove` is set.
    pub fn resolve_with(
        &self,
        settings: &Settings,
        cleanups: &mut Cleanups,
    ) -> Result<ResolvedPaths> {
        let home_dir = self.home_dir()?;
        let base = platform_data_dir_base(self.env.platform(), &self.env, &home_dir)?;
        let data_dir = app_data_dir(&base, &settings.app_name);
        tracing::debug!(
            data_dir = %data_dir.display(),
            app = %settings.app_name,
            "data directory"
        );

        if !data_dir.exists() {
            if !settings.data_dir_auto_create {
                return Err(Error::DataDirNotFound(data_dir));
            }
            create_data_dir(&data_dir, settings.data_dir_mode)?;
            tracing::info!(
                path = %data_dir.display(),
                mode = %format!("{:o}", settings.data_dir_mode),
                "created data directory"
            );
            if settings.data_dir_auto_remove {
                tracing::debug!(path = %data_dir.display(), "registered data directory cleanup");
                cleanups.push(DataDirCleanup::new(data_dir.clone()));
            }
        }

        Ok(ResolvedPaths { home_dir, data_dir })
    }

    /// `USERPROFILE`, then `HOME`, then the OS query. `USERPROFILE` is
    /// consulted on every platform.
    pub fn home_dir(&self) -> Result<PathBuf> {
        let raw = if let Some(profile) = self.env.non_empty_var("USERPROFILE") {
            tracing::debug!("home directory from USERPROFILE");
            PathBuf::from(profile)
        } else if let Some(home) = self.env.non_empty_var("HOME") {
            tracing::debug!("home directory from HOME");
            PathBuf::from(home)
        } else if let Some(home) = self.env.os_home_dir() {
            tracing::debug!("home directory from the OS user database");
            home
        } else {
            return Err(Error::HomeNotFound(PathBuf::new()));
        };

        let home = absolutize(&raw, &self.env)?;
        if !home.exists() {
            return Err(Error::HomeNotFound(home));
        }
        Ok(home)
    }
}

/// The per-user root that application data directories live under.
///
/// - Windows: `%APPDATA%`, or `<home>\AppData\Roaming` when it is unset
/// - macOS: `<home>/Library/Application Support`
/// - otherwise: `$XDG_CONFIG_HOME`, or `<home>/.config`
pub fn platform_data_dir_base(
    platform: Platform,
    env: &impl Environment,
    home_dir: &Path,
) -> Result<PathBuf> {
    let base = match platform {
        Platform::Windows => match env.non_empty_var("APPDATA") {
            Some(appdata) => absolutize(Path::new(&appdata), env)?,
            None => home_dir.join("AppData").join("Roaming"),
        },
        Platform::MacOs => home_dir.join("Library").join("Application Support"),
        Platform::Xdg => match env.non_empty_var("XDG_CONFIG_HOME") {
            Some(config_home) => absolutize(Path::new(&config_home), env)?,
            None => home_dir.join(".config"),
        },
    };
    Ok(base)
}

/// Append `app_name` below `base`. Roots and prefixes in the name are dropped
/// and `..` never climbs above `base`, so the result always stays inside it.
fn app_data_dir(base: &Path, app_name: &str) -> PathBuf {
    let mut dir = base.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(app_name).components() {
        match component {
            Component::Normal(segment) => {
                dir.push(segment);
                depth += 1;
            }
            Component::ParentDir if depth > 0 => {
                dir.pop();
                depth -= 1;
            }
            Component::ParentDir
            | Component::CurDir
            | Component::RootDir
            | Component::Prefix(_) => {}
        }
    }
    dir
}

fn create_data_dir(path: &Path, mode: u32) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    let result = builder.create(path);
    if path.is_dir() {
        return Ok(());
    }
    Err(Error::DataDirCreate {
        path: path.to_path_buf(),
        source: result.err(),
    })
}

/// Make `raw` absolute against the working directory and fold away `.` and
/// `..` without touching the filesystem.
fn absolutize(raw: &Path, env: &impl Environment) -> Result<PathBuf> {
    let joined = if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        env.current_dir().map_err(Error::CurrentDir)?.join(raw)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
