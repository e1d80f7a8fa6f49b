//! Error types for scrub-storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),

    #[error("Failed to load roster from {table}: {source}")]
    Roster {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Failed to insert record {record} (author {author_id}) into {table}: {source}")]
    Insert {
        table: String,
        record: String,
        author_id: i64,
        #[source]
        source: sqlx::Error,
    },

    #[error("Timestamp formatting error: {0}")]
    Timestamp(#[from] time::error::Format),
}
