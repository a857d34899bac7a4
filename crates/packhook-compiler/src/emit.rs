//! Asset planning and writing.

use std::path::{Path, PathBuf};

use tracing::debug;

use packhook_core::config::BuildConfig;
use packhook_core::{AppError, AppResult, ErrorKind};

/// One asset the build produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAsset {
    /// Entry the asset is produced from.
    pub entry: String,
    /// Entry module path, resolved against the context directory.
    pub source: PathBuf,
    /// Asset filename relative to the output directory.
    pub file_name: String,
}

/// Resolves the assets of a build against `context_dir`.
pub fn plan(build: &BuildConfig, context_dir: &Path) -> Vec<PlannedAsset> {
    build
        .asset_names()
        .into_iter()
        .map(|(entry, file_name)| PlannedAsset {
            source: context_dir.join(&build.entry[&entry]),
            entry,
            file_name,
        })
        .collect()
}

/// Copies every planned asset into `output_dir`, creating directories as needed.
pub async fn write(assets: &[PlannedAsset], output_dir: &Path) -> AppResult<()> {
    tokio::fs::create_dir_all(output_dir).await?;

    for asset in assets {
        let target = output_dir.join(&asset.file_name);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::copy(&asset.source, &target).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Io,
                format!(
                    "Cannot emit entry '{}' from '{}': {e}",
                    asset.entry,
                    asset.source.display()
                ),
                e,
            )
        })?;

        debug!(
            entry = %asset.entry,
            asset = %asset.file_name,
            "Asset written"
        );
    }

    Ok(())
}
