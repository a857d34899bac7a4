//! Applies plugins and runs the stages of one build.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use packhook_core::AppResult;
use packhook_core::config::AppConfig;
use packhook_plugin::{DispatchReport, Plugin, PluginManager, Stage, StageContext};

use crate::builtin;
use crate::emit::{self, PlannedAsset};

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Id shared by every stage context of the build.
    pub build_id: Uuid,
    /// Resolved output directory.
    pub output_path: PathBuf,
    /// Asset filenames, relative to the output directory.
    pub assets: Vec<String>,
    /// One report per dispatched stage, in dispatch order.
    pub reports: Vec<DispatchReport>,
}

impl BuildOutcome {
    /// Stages in the order they were dispatched.
    pub fn stages(&self) -> Vec<Stage> {
        self.reports.iter().map(|r| r.stage).collect()
    }
}

/// Drives one build through the pipeline stages.
#[derive(Debug)]
pub struct Compiler {
    /// Loaded configuration.
    config: AppConfig,
    /// Directory entry and output paths are resolved against.
    context_dir: PathBuf,
    /// Plugins and their callbacks.
    manager: PluginManager,
}

impl Compiler {
    /// Creates a compiler with no plugins applied.
    ///
    /// Paths resolve against the current directory.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let manager = PluginManager::with_config(&config.pipeline)?;
        Ok(Self {
            config,
            context_dir: PathBuf::from("."),
            manager,
        })
    }

    /// Resolves entry and output paths against `dir`.
    pub fn with_context_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context_dir = dir.into();
        self
    }

    /// Applies every plugin named in `build.plugins`, in order.
    pub async fn apply_plugins(&self) -> AppResult<()> {
        for name in &self.config.build.plugins {
            self.apply(builtin::resolve(name)?).await?;
        }
        Ok(())
    }

    /// Applies a single plugin.
    pub async fn apply(&self, plugin: Arc<dyn Plugin>) -> AppResult<()> {
        self.manager.load_plugin(plugin).await
    }

    /// The plugin manager.
    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    /// The configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Absolute-or-relative output directory for this build.
    pub fn output_dir(&self) -> PathBuf {
        self.context_dir.join(&self.config.build.output.path)
    }

    /// Runs one build.
    ///
    /// On failure the `failed` stage is dispatched (its own failures are only
    /// logged), `done` is skipped, and the original error is returned.
    pub async fn run(&self) -> AppResult<BuildOutcome> {
        let build_id = Uuid::new_v4();
        let started = Instant::now();

        info!(
            build_id = %build_id,
            mode = %self.config.build.mode,
            entries = self.config.build.entry.len(),
            "Build started"
        );

        match self.run_stages(build_id, started).await {
            Ok(outcome) => {
                info!(
                    build_id = %build_id,
                    assets = outcome.assets.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Build finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                error!(build_id = %build_id, error = %e, "Build failed");
                let ctx = self
                    .context(Stage::Failed, build_id)
                    .with_string("error", &e.to_string());
                self.manager.dispatcher().fire_and_forget(&ctx).await;
                Err(e)
            }
        }
    }

    async fn run_stages(&self, build_id: Uuid, started: Instant) -> AppResult<BuildOutcome> {
        let build = &self.config.build;
        let output_dir = self.output_dir();
        let planned = emit::plan(build, &self.context_dir);
        let asset_names: Vec<String> = planned.iter().map(|a| a.file_name.clone()).collect();
        let entries = serde_json::to_value(&build.entry)?;
        let mut reports = Vec::with_capacity(Stage::ALL.len());

        let ctx = self
            .context(Stage::Environment, build_id)
            .with_string("mode", &build.mode.to_string());
        reports.push(self.manager.dispatch(&ctx).await?);

        let ctx = self
            .context(Stage::BeforeRun, build_id)
            .with_data("entries", entries.clone());
        reports.push(self.manager.dispatch(&ctx).await?);

        let ctx = self
            .context(Stage::CompileStart, build_id)
            .with_data("params", self.compile_params());
        reports.push(self.manager.dispatch(&ctx).await?);

        let ctx = self
            .context(Stage::Make, build_id)
            .with_data("entries", entries);
        reports.push(self.manager.dispatch(&ctx).await?);

        let ctx = self.emit_context(Stage::Emit, build_id, &output_dir, &planned);
        reports.push(self.manager.dispatch(&ctx).await?);

        emit::write(&planned, &output_dir).await?;

        let ctx = self.emit_context(Stage::AfterEmit, build_id, &output_dir, &planned);
        reports.push(self.manager.dispatch(&ctx).await?);

        let ctx = self
            .context(Stage::Done, build_id)
            .with_data("assets", json!(asset_names))
            .with_int("elapsed_ms", started.elapsed().as_millis() as i64);
        reports.push(self.manager.dispatch(&ctx).await?);

        Ok(BuildOutcome {
            build_id,
            output_path: output_dir,
            assets: asset_names,
            reports,
        })
    }

    fn context(&self, stage: Stage, build_id: Uuid) -> StageContext {
        StageContext::new(stage).with_build_id(build_id)
    }

    fn emit_context(
        &self,
        stage: Stage,
        build_id: Uuid,
        output_dir: &Path,
        planned: &[PlannedAsset],
    ) -> StageContext {
        let assets: Vec<&str> = planned.iter().map(|a| a.file_name.as_str()).collect();
        self.context(stage, build_id)
            .with_string("output_path", &output_dir.to_string_lossy())
            .with_data("assets", json!(assets))
    }

    fn compile_params(&self) -> serde_json::Value {
        let build = &self.config.build;
        json!({
            "mode": build.mode,
            "entry": build.entry,
            "output": build.output,
            "externals": build.externals,
            "devtool": build.devtool,
            "optimization": build.optimization,
        })
    }
}
