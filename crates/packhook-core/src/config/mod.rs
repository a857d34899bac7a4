//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod build;
pub mod logging;
pub mod pipeline;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::build::BuildConfig;
pub use self::logging::LoggingConfig;
pub use self::pipeline::{DispatchMode, PipelineConfig};

use crate::error::AppError;

/// Prefix for environment variable overrides (`PACKHOOK__LOGGING__LEVEL=debug`).
pub const ENV_PREFIX: &str = "PACKHOOK";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Per-stage dispatch settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// The static build configuration handed to the pipeline driver.
    pub build: BuildConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Values from environment variables prefixed with `PACKHOOK__` override
    /// the file. The result is validated before it is returned.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(true))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        debug!(path = %path, env_prefix = ENV_PREFIX, "Configuration sources resolved");
        Self::finish(config)
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        Self::finish(config)
    }

    fn finish(config: config::Config) -> Result<Self, AppError> {
        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.build.validate()?;
        Ok(parsed)
    }
}
