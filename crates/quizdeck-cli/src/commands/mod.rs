pub mod catalog;
pub mod init;
pub mod play;
pub mod report;
pub mod validate;

use anyhow::Result;

use quizdeck_core::catalog::Manifest;
use quizdeck_core::loader::load_manifest;
use quizdeck_core::traits::TextSource;
use quizdeck_sources::{create_source, load_config_from, QuizdeckConfig};

use crate::SourceArgs;

/// Config, opened source and parsed manifest for one command.
pub struct Workspace {
    pub config: QuizdeckConfig,
    pub source: Box<dyn TextSource>,
    pub manifest: Manifest,
}

/// Load the config, open the selected source and read the manifest.
pub async fn open(args: &SourceArgs) -> Result<Workspace> {
    let config = load_config_from(args.config.as_deref())?;
    let name = args
        .source
        .clone()
        .unwrap_or_else(|| config.default_source.clone());
    let source = create_source(&config.source_config(&name)?)?;
    let reference = args.manifest.as_deref().unwrap_or(&config.manifest);

    tracing::debug!(source = %name, kind = source.name(), manifest = reference, "opening source");
    let manifest = load_manifest(source.as_ref(), reference).await?;

    Ok(Workspace {
        config,
        source,
        manifest,
    })
}
