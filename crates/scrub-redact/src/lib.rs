//! PII redaction for forum posts
//!
//! This crate provides:
//! - The process-wide rule table (phone, zip, email, name)
//! - The identity cache built from the user roster
//! - The ordered redaction pipeline

pub mod error;
pub mod identity;
pub mod redactor;
pub mod rules;

pub use error::{RedactError, Result};
pub use identity::{IdentityCache, IdentityEntry};
pub use redactor::{RedactionInfo, RedactionType, Redactor};
