//! Pipeline dispatch configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How the callbacks of one stage are driven.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Each callback is awaited before the next one starts.
    #[default]
    Sequential,
    /// All callbacks start together; the stage is order-independent.
    Parallel,
}

impl fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Parallel => write!(f, "parallel"),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Stage name → dispatch mode. Stages not listed are sequential.
    #[serde(default)]
    pub dispatch: BTreeMap<String, DispatchMode>,
}
