//! Unified application error types for Packhook.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A registration referenced a stage the pipeline does not know.
    InvalidStage,
    /// A registered callback failed while its stage was dispatched.
    CallbackFailure,
    /// A configuration file could not be loaded or deserialized.
    Configuration,
    /// Configuration or input validation failed.
    Validation,
    /// A conflict occurred (duplicate plugin id, etc.).
    Conflict,
    /// The requested resource was not found.
    NotFound,
    /// A filesystem I/O error occurred.
    Io,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStage => write!(f, "INVALID_STAGE"),
            Self::CallbackFailure => write!(f, "CALLBACK_FAILURE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Io => write!(f, "IO"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout Packhook.
///
/// Crate-specific failures are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. A callback failure keeps the error the
/// callback returned as its `source`.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid-stage error for an unknown stage identifier.
    pub fn invalid_stage(stage: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::InvalidStage,
            format!("Unknown pipeline stage '{}'", stage.as_ref()),
        )
    }

    /// Wrap the error a callback returned while `stage` was dispatched.
    pub fn callback_failure(stage: impl fmt::Display, tap_name: &str, cause: AppError) -> Self {
        Self::with_source(
            ErrorKind::CallbackFailure,
            format!("Callback '{tap_name}' failed during stage '{stage}': {}", cause.message),
            cause,
        )
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an I/O error without an underlying `std::io::Error`.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns true when this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Io, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display_includes_kind() {
        let err = AppError::invalid_stage("compile-finish");
        assert_eq!(
            err.to_string(),
            "INVALID_STAGE: Unknown pipeline stage 'compile-finish'"
        );
    }

    #[test]
    fn test_callback_failure_keeps_cause() {
        let cause = AppError::io("disk full");
        let err = AppError::callback_failure("emit", "FileListPlugin", cause);

        assert!(err.is(ErrorKind::CallbackFailure));
        assert!(err.message.contains("FileListPlugin"));
        assert!(err.message.contains("emit"));
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "IO: disk full");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AppError = io.into();
        assert_eq!(err.kind, ErrorKind::Io);
    }
}
