//! # packhook-compiler
//!
//! The pipeline driver. A [`Compiler`] owns the plugin manager, applies the
//! configured plugins, and walks the build stages in order, dispatching
//! each one to its callbacks.
//!
//! Bundling itself is not done here: each entry module is copied to its
//! rendered asset name so there is something on disk for plugins to see.

pub mod builtin;
pub mod compiler;
pub mod emit;

pub use builtin::{BUILTIN_PLUGINS, BuiltinPlugin};
pub use compiler::{BuildOutcome, Compiler};
