//! File list plugin implementation.

use std::path::PathBuf;

use packhook_plugin::prelude::*;
use tracing::info;

use crate::listing::{self, FILE_LIST_NAME};

/// Tap name and plugin id.
pub const PLUGIN_ID: &str = "FileListPlugin";

/// Writes a markdown list of the files in the output directory after emit.
#[derive(Debug, Clone)]
pub struct FileListPlugin {
    /// Name of the list file.
    file_name: String,
}

impl FileListPlugin {
    /// Create a plugin writing `filelist.md`.
    pub fn new() -> Self {
        Self {
            file_name: FILE_LIST_NAME.to_string(),
        }
    }

    /// Use a different list file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

impl Default for FileListPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for FileListPlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            id: PLUGIN_ID,
            name: "File list",
            version: env!("CARGO_PKG_VERSION"),
            description: "Writes a markdown list of the emitted files",
            stages: [Stage::AfterEmit]
        )
    }

    async fn apply(&self, hooks: &HookRegistry) -> AppResult<()> {
        let file_name = self.file_name.clone();
        hooks
            .tap_async(Stage::AfterEmit, PLUGIN_ID, move |ctx: StageContext| {
                let file_name = file_name.clone();
                async move {
                    let output_path = ctx.get_string("output_path").ok_or_else(|| {
                        AppError::not_found("after-emit context has no output_path")
                    })?;
                    let dir = PathBuf::from(output_path);

                    let names = listing::write_file_list(&dir, &file_name).await?;
                    info!(
                        build_id = %ctx.build_id(),
                        path = %dir.join(&file_name).display(),
                        files = names.len(),
                        "File list written"
                    );
                    Ok::<(), AppError>(())
                }
            })
            .await
    }
}
