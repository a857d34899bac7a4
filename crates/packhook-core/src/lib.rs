//! # packhook-core
//!
//! Core crate for Packhook. Contains the configuration schemas (logging,
//! pipeline dispatch modes, and the static build configuration) and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Packhook crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
