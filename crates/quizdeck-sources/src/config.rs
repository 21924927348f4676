//! Configuration file loading and source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizdeck_core::loader::DEFAULT_MANIFEST;
use quizdeck_core::traits::TextSource;

use crate::dir::DirSource;
use crate::http::{HttpSource, DEFAULT_TIMEOUT_SECS};

/// Configuration for a single text source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A local directory that manifest references are relative to.
    Dir {
        #[serde(default = "default_root")]
        root: PathBuf,
    },
    /// A base URL that manifest references are relative to.
    Http {
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level quizdeck configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizdeckConfig {
    /// Source configurations keyed by name.
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,
    /// Source used when none is given on the command line.
    #[serde(default = "default_source")]
    pub default_source: String,
    /// Manifest reference, resolved by the source.
    #[serde(default = "default_manifest")]
    pub manifest: String,
    /// Questions per session.
    #[serde(default = "default_count")]
    pub default_count: usize,
    /// Where wrong-answer notes and reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_source() -> String {
    "local".to_string()
}
fn default_manifest() -> String {
    DEFAULT_MANIFEST.to_string()
}
fn default_count() -> usize {
    20
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./wrong-notes")
}

impl Default for QuizdeckConfig {
    fn default() -> Self {
        Self {
            sources: HashMap::new(),
            default_source: default_source(),
            manifest: default_manifest(),
            default_count: default_count(),
            output_dir: default_output_dir(),
        }
    }
}

impl QuizdeckConfig {
    /// Look up a source by name. The name `local` falls back to the current
    /// directory when it is not configured.
    pub fn source_config(&self, name: &str) -> Result<SourceConfig> {
        match self.sources.get(name) {
            Some(config) => Ok(config.clone()),
            None if name == "local" => Ok(SourceConfig::Dir {
                root: default_root(),
            }),
            None => {
                let mut known: Vec<&str> = self.sources.keys().map(String::as_str).collect();
                known.sort_unstable();
                anyhow::bail!(
                    "unknown source '{name}' (configured: {})",
                    if known.is_empty() {
                        "none".to_string()
                    } else {
                        known.join(", ")
                    }
                )
            }
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Expand `${VAR}` references left to right. Substituted values are not
/// scanned again; an unterminated `${` is kept literally.
fn resolve_env_vars(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[start + 2 + len + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::Dir { root } => SourceConfig::Dir {
            root: PathBuf::from(resolve_env_vars(&root.to_string_lossy())),
        },
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => SourceConfig::Http {
            base_url: resolve_env_vars(base_url),
            timeout_secs: *timeout_secs,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizdeck.toml` in the current directory
/// 2. `~/.config/quizdeck/config.toml`
///
/// Environment variable overrides: `QUIZDECK_BASE_URL` (source `web`),
/// `QUIZDECK_DATA_DIR` (source `local`).
pub fn load_config() -> Result<QuizdeckConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizdeckConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizdeck.toml");
        if local.exists() {
            Some(local)
        } else {
            config_home()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizdeckConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

/// Parse config text and resolve `${VAR}` references in source settings.
pub fn parse_config(content: &str) -> Result<QuizdeckConfig> {
    let mut config: QuizdeckConfig = toml::from_str(content)?;
    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();
    Ok(config)
}

fn apply_env_overrides(config: &mut QuizdeckConfig) {
    if let Ok(url) = std::env::var("QUIZDECK_BASE_URL") {
        let timeout_secs = match config.sources.get("web") {
            Some(SourceConfig::Http { timeout_secs, .. }) => *timeout_secs,
            _ => DEFAULT_TIMEOUT_SECS,
        };
        config.sources.insert(
            "web".into(),
            SourceConfig::Http {
                base_url: url,
                timeout_secs,
            },
        );
    }

    if let Ok(root) = std::env::var("QUIZDECK_DATA_DIR") {
        config.sources.insert(
            "local".into(),
            SourceConfig::Dir {
                root: PathBuf::from(root),
            },
        );
    }
}

fn config_home() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizdeck"))
}

/// Create a source instance from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn TextSource>> {
    match config {
        SourceConfig::Dir { root } => Ok(Box::new(DirSource::new(root))),
        SourceConfig::Http {
            base_url,
            timeout_secs,
        } => {
            if base_url.trim().is_empty() {
                anyhow::bail!("http source has an empty base_url");
            }
            Ok(Box::new(HttpSource::with_timeout(base_url, *timeout_secs)?))
        }
    }
}
