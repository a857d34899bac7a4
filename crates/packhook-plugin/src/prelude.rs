//! Prelude for plugin authors.

pub use async_trait::async_trait;

pub use packhook_core::{AppError, AppResult};

pub use crate::hooks::definitions::{IntoStage, Stage, StageContext};
pub use crate::hooks::registry::{HookHandler, HookRegistry};
pub use crate::registry::{Plugin, PluginInfo};
pub use crate::traits::{AsyncHandler, SyncHandler};

pub use crate::{plugin_info, stage_context};
