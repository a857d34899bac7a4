//! Log plugin for Packhook.
//!
//! Taps `compile-start` with a synchronous callback and logs the compile
//! parameters the pipeline driver passes in.

pub mod plugin;

pub use plugin::LogPlugin;
