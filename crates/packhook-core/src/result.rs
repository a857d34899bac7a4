//! Convenience result type alias for Packhook.

use crate::error::AppError;

/// A specialized `Result` type for Packhook operations.
pub type AppResult<T> = Result<T, AppError>;
