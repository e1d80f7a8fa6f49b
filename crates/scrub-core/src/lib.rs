//! Core domain models for forum-scrub
//!
//! This crate contains:
//! - Raw forum documents as they come out of the export (`RawPost`)
//! - The typed record that flows through redaction into the store (`PostRecord`)
//! - Roster rows describing known forum users
//! - Legacy text rendering for the destination's text columns

pub mod error;
pub mod legacy;
pub mod post;
pub mod roster;

pub use error::{CoreError, Result};
pub use post::{PostRecord, RawPost, VoteIds, Votes};
pub use roster::RosterRow;
