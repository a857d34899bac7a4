//! # packhook-plugin
//!
//! Plugin framework for the Packhook build pipeline. Provides:
//!
//! - A closed set of pipeline stages with read-only stage contexts
//! - Hook registry that keeps callbacks in registration order per stage
//! - Hook dispatcher with sequential or parallel stages and halt-on-failure
//! - Sync and async closure handlers (`tap` / `tap_async`)
//! - Plugin registry and manager running each plugin's `apply` once

pub mod hooks;
pub mod macros;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod traits;

pub use hooks::definitions::{IntoStage, Stage, StageContext};
pub use hooks::dispatcher::{DispatchReport, HookDispatcher};
pub use hooks::registry::{HookHandler, HookRegistry};
pub use manager::PluginManager;
pub use registry::{Plugin, PluginInfo, PluginRegistry};
pub use traits::{AsyncHandler, SyncHandler};
