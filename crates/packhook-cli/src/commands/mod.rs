//! CLI command definitions and dispatch.

pub mod build;
pub mod config;
pub mod plugins;
pub mod stages;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use packhook_core::AppResult;
use packhook_core::config::AppConfig;

/// Packhook: run builds through a plugin hook pipeline
#[derive(Debug, Parser)]
#[command(name = "packhook", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one build
    Build(build::BuildArgs),
    /// List pipeline stages and how they dispatch
    Stages,
    /// List builtin plugins
    Plugins,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        match &self.command {
            Commands::Build(args) => build::execute(args, &self.config, self.format).await,
            Commands::Stages => stages::execute(&self.config, self.format).await,
            Commands::Plugins => plugins::execute(self.format),
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }
}

/// Load and validate the configuration file.
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
}
