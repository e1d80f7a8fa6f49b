//! Error types for scrub-redact

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedactError>;

#[derive(Error, Debug)]
pub enum RedactError {
    #[error("Roster row has non-integer author id: {0:?}")]
    InvalidAuthorId(String),
}
