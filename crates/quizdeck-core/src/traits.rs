//! Core trait definitions for text sources.
//!
//! The manifest and every question/answer file are read through
//! [`TextSource`]. Implementations live in the `quizdeck-sources` crate.

use async_trait::async_trait;

use crate::error::SourceError;

// ---------------------------------------------------------------------------
// Text source trait
// ---------------------------------------------------------------------------

/// Trait for backends that resolve a resource reference to its text.
///
/// References are the strings written in the manifest (`data/회계_1_q.txt`);
/// how they map to files or URLs is up to the implementation.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Human-readable source name (e.g. "dir").
    fn name(&self) -> &str;

    /// Read the full text of a resource.
    async fn fetch_text(&self, reference: &str) -> Result<String, SourceError>;
}
