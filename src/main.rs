//! Packhook: runs one build through the plugin hook pipeline.
//!
//! The configuration file is taken from `PACKHOOK_CONFIG`.

use tracing_subscriber::{EnvFilter, fmt};

use packhook_compiler::Compiler;
use packhook_core::AppResult;
use packhook_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(kind = %e.kind, "Build error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> AppResult<AppConfig> {
    let config_path =
        std::env::var("PACKHOOK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting Packhook v{}", env!("CARGO_PKG_VERSION"));

    let compiler = Compiler::new(config)?;
    compiler.apply_plugins().await?;

    for (stage, taps) in compiler.manager().taps().await {
        tracing::debug!(stage = %stage, taps = ?taps, "Stage taps");
    }

    let outcome = compiler.run().await?;
    for asset in &outcome.assets {
        tracing::info!(asset = %asset, "Emitted");
    }

    Ok(())
}
