//! Plugin registry: stores applied plugin instances and metadata.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use packhook_core::{AppError, AppResult};

use crate::hooks::registry::HookRegistry;

/// Metadata about a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin identifier, also used as the tap name of its callbacks.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Stages the plugin taps.
    pub stages: Vec<String>,
}

/// Trait that all plugins implement.
///
/// `apply` is the plugin's registration phase: it is called exactly once,
/// before any stage is dispatched, with the registry to tap into.
#[async_trait]
pub trait Plugin: Send + Sync + std::fmt::Debug {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Registers the plugin's callbacks.
    async fn apply(&self, hooks: &HookRegistry) -> AppResult<()>;
}

/// Registry of all applied plugins.
#[derive(Debug)]
pub struct PluginRegistry {
    /// Plugin ID → plugin instance.
    plugins: RwLock<HashMap<String, Arc<dyn Plugin>>>,
    /// Metadata in load order.
    metadata: RwLock<Vec<PluginInfo>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(HashMap::new()),
            metadata: RwLock::new(Vec::new()),
        }
    }

    /// Registers a plugin. Fails if its id is already taken.
    pub async fn register(&self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        let info = plugin.info();
        let id = info.id.clone();

        let mut plugins = self.plugins.write().await;
        let mut metadata = self.metadata.write().await;

        if plugins.contains_key(&id) {
            return Err(AppError::conflict(format!(
                "Plugin '{}' is already registered",
                id
            )));
        }

        info!(plugin_id = %id, name = %info.name, version = %info.version, "Registering plugin");

        plugins.insert(id, plugin);
        metadata.push(info);

        Ok(())
    }

    /// Unregisters a plugin by ID.
    pub async fn unregister(&self, plugin_id: &str) -> AppResult<Arc<dyn Plugin>> {
        let mut plugins = self.plugins.write().await;
        let mut metadata = self.metadata.write().await;

        let plugin = plugins
            .remove(plugin_id)
            .ok_or_else(|| AppError::not_found(format!("Plugin '{}' not found", plugin_id)))?;

        metadata.retain(|info| info.id != plugin_id);

        info!(plugin_id = %plugin_id, "Plugin unregistered");

        Ok(plugin)
    }

    /// Lists plugin metadata in load order.
    pub async fn list(&self) -> Vec<PluginInfo> {
        self.metadata.read().await.clone()
    }

    /// Returns plugin count.
    pub async fn count(&self) -> usize {
        let plugins = self.plugins.read().await;
        plugins.len()
    }

    /// Checks whether a plugin is registered.
    pub async fn contains(&self, plugin_id: &str) -> bool {
        let plugins = self.plugins.read().await;
        plugins.contains_key(plugin_id)
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
