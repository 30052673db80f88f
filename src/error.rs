use std::path::PathBuf;

use thiserror::Error;

/// An error from resolving the home or data directory.
#[derive(Debug, Error)]
pub enum Error {
    #[error(r#"home directory not found: "{}""#, .0.display())]
    HomeNotFound(PathBuf),

    #[error(r#"data directory not found: "{}""#, .0.display())]
    DataDirNotFound(PathBuf),

    #[error(r#"failed to auto-create data directory: "{}""#, .path.display())]
    DataDirCreate {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("failed to read the current directory")]
    CurrentDir(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
