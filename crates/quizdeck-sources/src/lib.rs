//! quizdeck-sources: text sources for manifests and question files.
//!
//! Implements the `TextSource` trait for a local data directory and an HTTP
//! base URL, plus an in-memory mock, and loads `quizdeck.toml`.

pub mod config;
pub mod dir;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, load_config_from, QuizdeckConfig, SourceConfig};
pub use dir::DirSource;
pub use http::HttpSource;
pub use mock::MockSource;
pub use quizdeck_core::error::SourceError;
