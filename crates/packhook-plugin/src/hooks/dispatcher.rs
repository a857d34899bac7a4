//! Hook dispatcher: invokes the callbacks of a stage when the pipeline
//! reaches it.
//!
//! Sequential stages (the default):
//! - Callbacks run one at a time in registration order.
//! - The first failure stops the stage; later callbacks are not invoked.
//!
//! Parallel stages:
//! - All callbacks start together and are polled concurrently.
//! - The first failure completes the dispatch; the rest are dropped.
//!
//! Completed callbacks are never rolled back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use tracing::{debug, error, warn};

use packhook_core::config::{DispatchMode, PipelineConfig};
use packhook_core::{AppError, AppResult};

use super::definitions::{IntoStage, Stage, StageContext};
use super::registry::{HookHandler, HookRegistry};

/// Outcome of a dispatch in which every callback succeeded.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// The stage that was dispatched.
    pub stage: Stage,
    /// How the callbacks were driven.
    pub mode: DispatchMode,
    /// Tap names of the invoked callbacks, in registration order.
    pub invoked: Vec<String>,
    /// Wall time spent in callbacks.
    pub elapsed: Duration,
}

impl DispatchReport {
    fn empty(stage: Stage, mode: DispatchMode) -> Self {
        Self {
            stage,
            mode,
            invoked: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Number of callbacks invoked.
    pub fn handler_count(&self) -> usize {
        self.invoked.len()
    }
}

/// Dispatches stages to their registered callbacks.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Stages marked order-independent. Absent stages are sequential.
    modes: HashMap<Stage, DispatchMode>,
}

impl HookDispatcher {
    /// Creates a dispatcher where every stage is sequential.
    pub fn new(registry: Arc<HookRegistry>) -> Self {
        Self {
            registry,
            modes: HashMap::new(),
        }
    }

    /// Creates a dispatcher using the per-stage modes from configuration.
    ///
    /// Fails with an invalid-stage error if the configuration names a stage
    /// the pipeline does not have.
    pub fn from_config(registry: Arc<HookRegistry>, config: &PipelineConfig) -> AppResult<Self> {
        let mut dispatcher = Self::new(registry);
        for (name, mode) in &config.dispatch {
            dispatcher = dispatcher.with_mode(name, *mode)?;
        }
        Ok(dispatcher)
    }

    /// Sets the dispatch mode for one stage.
    pub fn with_mode<S: IntoStage>(mut self, stage: S, mode: DispatchMode) -> AppResult<Self> {
        self.modes.insert(stage.into_stage()?, mode);
        Ok(self)
    }

    /// Returns the dispatch mode of a stage.
    pub fn mode(&self, stage: Stage) -> DispatchMode {
        self.modes.get(&stage).copied().unwrap_or_default()
    }

    /// Dispatches the context's stage to every registered callback.
    ///
    /// Returns a report once all callbacks completed, or the callback
    /// failure of the first callback that failed.
    pub async fn dispatch(&self, ctx: &StageContext) -> AppResult<DispatchReport> {
        let stage = ctx.stage();
        let mode = self.mode(stage);
        let handlers = self.registry.handlers(stage).await;

        if handlers.is_empty() {
            return Ok(DispatchReport::empty(stage, mode));
        }

        debug!(
            stage = %stage,
            mode = %mode,
            handler_count = handlers.len(),
            "Dispatching stage"
        );

        let started = Instant::now();
        match mode {
            DispatchMode::Sequential => {
                for handler in &handlers {
                    invoke(handler, ctx).await?;
                }
            }
            DispatchMode::Parallel => {
                try_join_all(handlers.iter().map(|handler| invoke(handler, ctx))).await?;
            }
        }

        Ok(DispatchReport {
            stage,
            mode,
            invoked: handlers.iter().map(|h| h.tap_name().to_string()).collect(),
            elapsed: started.elapsed(),
        })
    }

    /// Dispatches a stage and only logs a failure.
    ///
    /// Used where the driver is already reporting another error.
    pub async fn fire_and_forget(&self, ctx: &StageContext) {
        if let Err(e) = self.dispatch(ctx).await {
            warn!(stage = %ctx.stage(), error = %e, "Ignoring stage failure");
        }
    }
}

async fn invoke(handler: &Arc<dyn HookHandler>, ctx: &StageContext) -> AppResult<()> {
    handler.call(ctx).await.map_err(|e| {
        error!(
            stage = %ctx.stage(),
            tap_name = %handler.tap_name(),
            error = %e,
            "Stage callback failed"
        );
        AppError::callback_failure(ctx.stage(), handler.tap_name(), e)
    })
}
