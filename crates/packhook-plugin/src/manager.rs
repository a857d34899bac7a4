//! Plugin manager: applies plugins and owns the hook registry and dispatcher.

use std::sync::Arc;

use tracing::{info, warn};

use packhook_core::config::PipelineConfig;
use packhook_core::{AppError, AppResult};

use crate::hooks::definitions::{Stage, StageContext};
use crate::hooks::dispatcher::{DispatchReport, HookDispatcher};
use crate::hooks::registry::HookRegistry;
use crate::registry::{Plugin, PluginInfo, PluginRegistry};

/// Manages plugins: apply, list, unload.
#[derive(Debug)]
pub struct PluginManager {
    /// Plugin registry.
    plugin_registry: Arc<PluginRegistry>,
    /// Hook registry.
    hook_registry: Arc<HookRegistry>,
    /// Hook dispatcher.
    hook_dispatcher: Arc<HookDispatcher>,
}

impl PluginManager {
    /// Creates a plugin manager where every stage is sequential.
    pub fn new() -> Self {
        let hook_registry = Arc::new(HookRegistry::new());
        let hook_dispatcher = Arc::new(HookDispatcher::new(hook_registry.clone()));

        Self {
            plugin_registry: Arc::new(PluginRegistry::new()),
            hook_registry,
            hook_dispatcher,
        }
    }

    /// Creates a plugin manager with per-stage dispatch modes from configuration.
    pub fn with_config(config: &PipelineConfig) -> AppResult<Self> {
        let hook_registry = Arc::new(HookRegistry::new());
        let hook_dispatcher = Arc::new(HookDispatcher::from_config(
            hook_registry.clone(),
            config,
        )?);

        Ok(Self {
            plugin_registry: Arc::new(PluginRegistry::new()),
            hook_registry,
            hook_dispatcher,
        })
    }

    /// Applies a plugin: runs its registration phase once and records it.
    ///
    /// If `apply` fails, whatever the plugin registered before failing is
    /// removed again.
    pub async fn load_plugin(&self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let info = plugin.info();

        if self.plugin_registry.contains(&info.id).await {
            return Err(AppError::conflict(format!(
                "Plugin '{}' is already registered",
                info.id
            )));
        }

        if let Err(e) = plugin.apply(&self.hook_registry).await {
            let removed = self.hook_registry.unregister_plugin(&info.id).await;
            warn!(
                plugin_id = %info.id,
                error = %e,
                removed,
                "Plugin apply failed, registrations rolled back"
            );
            return Err(e);
        }

        self.plugin_registry.register(plugin).await?;

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            stages = info.stages.len(),
            "Plugin applied"
        );

        Ok(())
    }

    /// Removes a plugin and all of its callbacks.
    pub async fn unload_plugin(&self, plugin_id: &str) -> AppResult<()> {
        self.plugin_registry.unregister(plugin_id).await?;
        let removed = self.hook_registry.unregister_plugin(plugin_id).await;

        info!(plugin_id = %plugin_id, removed, "Plugin unloaded");

        Ok(())
    }

    /// Dispatches a stage through the manager's dispatcher.
    pub async fn dispatch(&self, ctx: &StageContext) -> AppResult<DispatchReport> {
        self.hook_dispatcher.dispatch(ctx).await
    }

    /// Returns the hook dispatcher for firing stages.
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.hook_dispatcher
    }

    /// Returns the hook registry.
    pub fn hook_registry(&self) -> &Arc<HookRegistry> {
        &self.hook_registry
    }

    /// Returns the plugin registry.
    pub fn plugin_registry(&self) -> &Arc<PluginRegistry> {
        &self.plugin_registry
    }

    /// Lists applied plugins in load order.
    pub async fn list_plugins(&self) -> Vec<PluginInfo> {
        self.plugin_registry.list().await
    }

    /// Returns `(stage, tap names)` for every stage with callbacks.
    pub async fn taps(&self) -> Vec<(Stage, Vec<String>)> {
        let mut taps = Vec::new();
        for stage in self.hook_registry.registered_stages().await {
            taps.push((stage, self.hook_registry.tap_names(stage).await));
        }
        taps
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use packhook_core::ErrorKind;

    #[derive(Debug)]
    struct TwoStagePlugin {
        id: &'static str,
        fail_after_first: bool,
    }

    #[async_trait]
    impl Plugin for TwoStagePlugin {
        fn info(&self) -> PluginInfo {
            crate::plugin_info!(
                id: self.id,
                name: "Two stage",
                version: "0.1.0",
                description: "taps make and done",
                stages: [Stage::Make, Stage::Done]
            )
        }

        async fn apply(&self, hooks: &HookRegistry) -> AppResult<()> {
            hooks
                .tap(Stage::Make, self.id, |_ctx: &StageContext| Ok(()))
                .await?;
            if self.fail_after_first {
                return Err(AppError::internal("apply failed"));
            }
            hooks
                .tap(Stage::Done, self.id, |_ctx: &StageContext| Ok(()))
                .await
        }
    }

    fn plugin(id: &'static str, fail_after_first: bool) -> Arc<dyn Plugin> {
        Arc::new(TwoStagePlugin {
            id,
            fail_after_first,
        })
    }

    #[tokio::test]
    async fn test_load_and_list() {
        let manager = PluginManager::new();
        manager.load_plugin(plugin("alpha", false)).await.unwrap();
        manager.load_plugin(plugin("beta", false)).await.unwrap();

        let ids: Vec<String> = manager
            .list_plugins()
            .await
            .into_iter()
            .map(|info| info.id)
            .collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
        assert_eq!(
            manager.hook_registry().tap_names(Stage::Make).await,
            vec!["alpha", "beta"]
        );
    }

    #[tokio::test]
    async fn test_duplicate_plugin_is_rejected_before_apply() {
        let manager = PluginManager::new();
        manager.load_plugin(plugin("alpha", false)).await.unwrap();

        let err = manager.load_plugin(plugin("alpha", false)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(manager.hook_registry().handler_count(Stage::Make).await, 1);
    }

    #[tokio::test]
    async fn test_failed_apply_rolls_back() {
        let manager = PluginManager::new();
        let err = manager.load_plugin(plugin("broken", true)).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(!manager.hook_registry().has_handlers(Stage::Make).await);
        assert_eq!(manager.plugin_registry().count().await, 0);
    }

    #[tokio::test]
    async fn test_unload_removes_only_that_plugin() {
        let manager = PluginManager::new();
        manager.load_plugin(plugin("alpha", false)).await.unwrap();
        manager.load_plugin(plugin("beta", false)).await.unwrap();

        manager.unload_plugin("alpha").await.unwrap();

        assert_eq!(
            manager.taps().await,
            vec![
                (Stage::Make, vec!["beta".to_string()]),
                (Stage::Done, vec!["beta".to_string()]),
            ]
        );
        let err = manager.unload_plugin("alpha").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
