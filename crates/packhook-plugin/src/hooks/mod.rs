//! Hook system: stage definitions, registry, and dispatcher.

pub mod definitions;
pub mod dispatcher;
pub mod registry;

pub use definitions::{IntoStage, Stage, StageContext};
pub use dispatcher::{DispatchReport, HookDispatcher};
pub use registry::{HookHandler, HookRegistry};
