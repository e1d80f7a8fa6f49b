//! Storage layer for forum-scrub
//!
//! This crate provides:
//! - SQLite connection handling
//! - Forum table preparation (empty or create)
//! - Roster queries feeding the identity cache
//! - The post sink that receives redacted records

pub mod db;
pub mod error;
pub mod schema;
pub mod sink;

pub use db::Storage;
pub use error::{Result, StorageError};
pub use sink::{PostSink, RosterSource};
