//! Hook registry: callbacks are recorded per stage in registration order.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use packhook_core::AppResult;

use super::definitions::{IntoStage, Stage, StageContext};
use crate::traits::{AsyncHandler, SyncHandler};

/// Trait for stage callback implementations.
#[async_trait]
pub trait HookHandler: Send + Sync + std::fmt::Debug {
    /// Runs the callback for one stage occurrence.
    async fn call(&self, ctx: &StageContext) -> AppResult<()>;

    /// Returns the tap name (the plugin that registered this callback).
    fn tap_name(&self) -> &str;
}

/// Entry in the hook registry.
#[derive(Debug)]
struct HookEntry {
    /// The handler.
    handler: Arc<dyn HookHandler>,
    /// Tap name captured at registration.
    tap_name: String,
}

/// Registry of stage callbacks.
///
/// Callbacks are only appended, so the list for each stage is always in
/// registration order.
#[derive(Debug)]
pub struct HookRegistry {
    /// Stage → callbacks in registration order.
    handlers: RwLock<HashMap<Stage, Vec<HookEntry>>>,
}

impl HookRegistry {
    /// Creates a new empty hook registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a handler for a stage.
    ///
    /// Fails with an invalid-stage error when `stage` does not name a known
    /// stage; nothing is recorded in that case.
    pub async fn register<S: IntoStage>(
        &self,
        stage: S,
        handler: Arc<dyn HookHandler>,
    ) -> AppResult<()> {
        let stage = stage.into_stage()?;
        let tap_name = handler.tap_name().to_string();

        let mut handlers = self.handlers.write().await;
        let entries = handlers.entry(stage).or_default();
        entries.push(HookEntry {
            handler,
            tap_name: tap_name.clone(),
        });

        info!(
            stage = %stage,
            tap_name = %tap_name,
            position = entries.len(),
            "Hook handler registered"
        );

        Ok(())
    }

    /// Registers a synchronous closure for a stage.
    pub async fn tap<S, F>(&self, stage: S, tap_name: &str, callback: F) -> AppResult<()>
    where
        S: IntoStage,
        F: Fn(&StageContext) -> AppResult<()> + Send + Sync + 'static,
    {
        self.register(stage, Arc::new(SyncHandler::new(tap_name, callback)))
            .await
    }

    /// Registers an asynchronous closure for a stage.
    pub async fn tap_async<S, F, Fut>(&self, stage: S, tap_name: &str, callback: F) -> AppResult<()>
    where
        S: IntoStage,
        F: Fn(StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        self.register(stage, Arc::new(AsyncHandler::new(tap_name, callback)))
            .await
    }

    /// Removes every handler registered under `tap_name`.
    ///
    /// Returns how many handlers were removed.
    pub async fn unregister_plugin(&self, tap_name: &str) -> usize {
        let mut handlers = self.handlers.write().await;
        let mut removed = 0;

        for entries in handlers.values_mut() {
            let before = entries.len();
            entries.retain(|e| e.tap_name != tap_name);
            removed += before - entries.len();
        }

        handlers.retain(|_, entries| !entries.is_empty());

        debug!(tap_name = %tap_name, removed, "Hook handlers unregistered");
        removed
    }

    /// Returns a snapshot of the handlers for a stage, in registration order.
    pub async fn handlers(&self, stage: Stage) -> Vec<Arc<dyn HookHandler>> {
        let handlers = self.handlers.read().await;
        handlers
            .get(&stage)
            .map(|entries| entries.iter().map(|e| e.handler.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the tap names registered for a stage, in registration order.
    pub async fn tap_names(&self, stage: Stage) -> Vec<String> {
        let handlers = self.handlers.read().await;
        handlers
            .get(&stage)
            .map(|entries| entries.iter().map(|e| e.tap_name.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns whether any handlers are registered for a stage.
    pub async fn has_handlers(&self, stage: Stage) -> bool {
        let handlers = self.handlers.read().await;
        handlers
            .get(&stage)
            .map(|entries| !entries.is_empty())
            .unwrap_or(false)
    }

    /// Returns the number of handlers registered for a stage.
    pub async fn handler_count(&self, stage: Stage) -> usize {
        let handlers = self.handlers.read().await;
        handlers.get(&stage).map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns all stages with at least one handler, in pipeline order.
    pub async fn registered_stages(&self) -> Vec<Stage> {
        let handlers = self.handlers.read().await;
        let mut stages: Vec<Stage> = handlers.keys().copied().collect();
        stages.sort();
        stages
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
