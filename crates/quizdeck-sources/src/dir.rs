//! Local directory source.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use quizdeck_core::error::SourceError;
use quizdeck_core::traits::TextSource;

/// Reads references as paths relative to a root directory.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a reference to a path under the root. References may not climb
    /// out of the root or be absolute.
    fn resolve(&self, reference: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(reference.trim().trim_start_matches("./"));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || relative.as_os_str().is_empty() {
            return Err(SourceError::Io {
                reference: reference.to_string(),
                message: "reference must be a relative path inside the data root".into(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl TextSource for DirSource {
    fn name(&self) -> &str {
        "dir"
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    async fn fetch_text(&self, reference: &str) -> Result<String, SourceError> {
        let path = self.resolve(reference)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(SourceError::NotFound(reference.to_string()))
            }
            Err(e) => Err(SourceError::Io {
                reference: reference.to_string(),
                message: e.to_string(),
            }),
        }
    }
}
