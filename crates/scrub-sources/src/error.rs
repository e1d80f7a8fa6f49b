//! Error types for scrub-sources

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Export path does not exist: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{path}:{line}: malformed document: {source}")]
    Malformed {
        path: PathBuf,
        line: usize,
        #[source]
        source: scrub_core::CoreError,
    },
}
