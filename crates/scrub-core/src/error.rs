use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Record {record} has no author id")]
    MissingAuthorId { record: String },

    #[error("Record {record} has non-integer author id: {value}")]
    InvalidAuthorId { record: String, value: String },

    #[error("Record {record} has unreadable created_at: {value}")]
    InvalidTimestamp { record: String, value: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
