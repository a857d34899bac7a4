//! Builtin plugins selectable by name from `build.plugins`.

use std::sync::Arc;

use serde::Serialize;

use packhook_core::{AppError, AppResult};
use packhook_plugin::Plugin;
use plugin_file_list::FileListPlugin;
use plugin_log::LogPlugin;

/// A plugin that can be named in configuration.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuiltinPlugin {
    /// Name used in `build.plugins`.
    pub name: &'static str,
    /// Stage the plugin taps.
    pub stage: &'static str,
    /// What it does.
    pub description: &'static str,
}

/// All builtin plugins.
pub const BUILTIN_PLUGINS: &[BuiltinPlugin] = &[
    BuiltinPlugin {
        name: "log",
        stage: "compile-start",
        description: "Logs the compile parameters",
    },
    BuiltinPlugin {
        name: "file-list",
        stage: "after-emit",
        description: "Writes filelist.md listing the output directory",
    },
];

/// Instantiates the builtin plugin called `name`.
pub fn resolve(name: &str) -> AppResult<Arc<dyn Plugin>> {
    match name {
        "log" => Ok(Arc::new(LogPlugin::new())),
        "file-list" => Ok(Arc::new(FileListPlugin::new())),
        other => Err(AppError::configuration(format!(
            "Unknown plugin '{other}' (available: {})",
            BUILTIN_PLUGINS
                .iter()
                .map(|p| p.name)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
