//! File list plugin for Packhook.
//!
//! Taps `after-emit` with an asynchronous callback that enumerates the
//! output directory and writes `filelist.md` next to the emitted assets.

pub mod listing;
pub mod plugin;

pub use plugin::FileListPlugin;
