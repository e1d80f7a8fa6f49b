//! Post source trait

use async_trait::async_trait;
use scrub_core::RawPost;

use crate::Result;

/// Sequential reader of raw forum documents.
#[async_trait]
pub trait PostSource: Send {
    /// Human-readable name (used in logs).
    fn name(&self) -> &'static str;

    /// Next document, or `None` once the source is exhausted.
    async fn next_post(&mut self) -> Result<Option<RawPost>>;
}
