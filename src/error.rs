use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a run. One file's failure stops the whole run;
/// there is deliberately no per-file isolation and no retry.
#[derive(Debug, Error)]
pub enum GtscribeError {
    #[error("no *.{} files found under {}", ext, target.display())]
    NoMatchingFiles { target: PathBuf, ext: String },

    #[error("generation service failure: {detail}")]
    Generation { detail: String },

    #[error("{} is not valid UTF-8", path.display())]
    Encoding { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GtscribeError>;
