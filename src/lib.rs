//! Determine the current user's home directory and a per-application data
//! directory, creating the latter on demand.
//!
//! ```no_run
//! let mut cleanups = syspath::Cleanups::new();
//! let paths = syspath::resolve(&syspath::ResolverOptions::new().app_name("demo"), &mut cleanups)?;
//! println!("{}", paths.data_dir.display());
//! # Ok::<(), syspath::Error>(())
//! ```

pub mod cleanup;
pub mod env;
pub mod error;
pub mod options;
pub mod resolver;

pub use cleanup::{Cleanups, DataDirCleanup};
pub use env::{Environment, FixedEnv, Platform, ProcessEnv};
pub use error::{Error, Result};
pub use options::{ResolverOptions, Settings};
pub use resolver::{PathResolver, ResolvedPaths, platform_data_dir_base};

/// Resolve against the real process environment.
pub fn resolve(options: &ResolverOptions, cleanups: &mut Cleanups) -> Result<ResolvedPaths> {
    PathResolver::new(ProcessEnv).resolve(options, cleanups)
}
