//! Pipeline stage definitions and the context passed to stage callbacks.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use packhook_core::{AppError, AppResult};

/// Enumeration of every point in the build pipeline where callbacks may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    /// Fired once the configuration is loaded and plugins are applied.
    Environment,
    /// Fired right before the build starts running.
    BeforeRun,
    /// Fired when compilation starts. Carries the compile parameters.
    CompileStart,
    /// Fired while entry modules are collected.
    Make,
    /// Fired before assets are written to the output directory.
    Emit,
    /// Fired after assets are written to the output directory.
    AfterEmit,
    /// Fired when the build completed successfully.
    Done,
    /// Fired when the build failed.
    Failed,
}

impl Stage {
    /// Every stage, in the order a successful build reaches them.
    pub const ALL: [Stage; 8] = [
        Self::Environment,
        Self::BeforeRun,
        Self::CompileStart,
        Self::Make,
        Self::Emit,
        Self::AfterEmit,
        Self::Done,
        Self::Failed,
    ];

    /// Returns the canonical identifier of this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::BeforeRun => "before-run",
            Self::CompileStart => "compile-start",
            Self::Make => "make",
            Self::Emit => "emit",
            Self::AfterEmit => "after-emit",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }

    /// Short description of when the stage fires.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Environment => "configuration loaded, plugins applied",
            Self::BeforeRun => "build about to run",
            Self::CompileStart => "compilation starting",
            Self::Make => "entry modules collected",
            Self::Emit => "assets about to be written",
            Self::AfterEmit => "assets written",
            Self::Done => "build succeeded",
            Self::Failed => "build failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stage {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| AppError::invalid_stage(s))
    }
}

/// Anything that names a stage: the enum itself or its string identifier.
pub trait IntoStage {
    /// Resolves to a known stage or fails with an invalid-stage error.
    fn into_stage(self) -> AppResult<Stage>;
}

impl IntoStage for Stage {
    fn into_stage(self) -> AppResult<Stage> {
        Ok(self)
    }
}

impl IntoStage for &str {
    fn into_stage(self) -> AppResult<Stage> {
        self.parse()
    }
}

impl IntoStage for &String {
    fn into_stage(self) -> AppResult<Stage> {
        self.parse()
    }
}

impl IntoStage for String {
    fn into_stage(self) -> AppResult<Stage> {
        self.parse()
    }
}

/// Read-only snapshot of pipeline state handed to every callback of a stage.
///
/// Values are built up by the pipeline driver before dispatch; callbacks only
/// see a shared reference. Async callbacks clone it when they need to keep it
/// past the borrow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageContext {
    stage: Stage,
    build_id: Uuid,
    timestamp: DateTime<Utc>,
    data: HashMap<String, serde_json::Value>,
}

impl StageContext {
    /// Creates an empty context for `stage` with a fresh build id.
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            build_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            data: HashMap::new(),
        }
    }

    /// Sets the build id this context belongs to.
    pub fn with_build_id(mut self, build_id: Uuid) -> Self {
        self.build_id = build_id;
        self
    }

    /// Inserts a data value.
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// The stage being dispatched.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Id of the build run.
    pub fn build_id(&self) -> Uuid {
        self.build_id
    }

    /// When the context was captured.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// All data values.
    pub fn data(&self) -> &HashMap<String, serde_json::Value> {
        &self.data
    }

    /// Gets a data value by key.
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a string data value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 data value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool data value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(|v| v.as_bool())
    }

    /// Gets a list of strings, skipping non-string items.
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.data
            .get(key)
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
