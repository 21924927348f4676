//! Mock source for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizdeck_core::error::SourceError;
use quizdeck_core::traits::TextSource;

/// An in-memory source keyed by reference.
///
/// Unknown references yield [`SourceError::NotFound`]; references registered
/// with [`MockSource::with_failure`] yield an HTTP 500.
pub struct MockSource {
    files: HashMap<String, String>,
    failing: Vec<String>,
    call_count: AtomicU32,
    requested: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new(files: HashMap<String, String>) -> Self {
        Self {
            files,
            failing: Vec::new(),
            call_count: AtomicU32::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Build from `(reference, text)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Make `reference` fail with a server error.
    pub fn with_failure(mut self, reference: &str) -> Self {
        self.failing.push(reference.to_string());
        self
    }

    /// Number of reads made through this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// References requested so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_text(&self, reference: &str) -> Result<String, SourceError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(reference.to_string());
        }

        if self.failing.iter().any(|r| r == reference) {
            return Err(SourceError::Http {
                status: 500,
                reference: reference.to_string(),
            });
        }
        self.files
            .get(reference)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(reference.to_string()))
    }
}
