//! Log plugin implementation.

use packhook_plugin::prelude::*;
use tracing::info;

/// Tap name and plugin id.
pub const PLUGIN_ID: &str = "LogPlugin";

/// Logs the `params` of every compile-start occurrence.
#[derive(Debug, Default)]
pub struct LogPlugin;

impl LogPlugin {
    /// Create a new log plugin
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Plugin for LogPlugin {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            id: PLUGIN_ID,
            name: "Log",
            version: env!("CARGO_PKG_VERSION"),
            description: "Logs the compile parameters",
            stages: [Stage::CompileStart]
        )
    }

    async fn apply(&self, hooks: &HookRegistry) -> AppResult<()> {
        hooks
            .tap(Stage::CompileStart, PLUGIN_ID, |ctx: &StageContext| {
                let params = ctx
                    .get_data("params")
                    .cloned()
                    .unwrap_or(serde_json::Value::Null);
                info!(build_id = %ctx.build_id(), params = %params, "params");
                Ok(())
            })
            .await
    }
}
