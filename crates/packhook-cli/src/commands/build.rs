//! `packhook build`: run one build.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use packhook_compiler::{BuildOutcome, Compiler};
use packhook_core::AppResult;

/// Arguments for the build command
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Directory entry and output paths are resolved against
    #[arg(long, default_value = ".")]
    pub context: PathBuf,

    /// Extra builtin plugins applied after the configured ones
    #[arg(short, long = "plugin")]
    pub plugins: Vec<String>,
}

#[derive(Debug, Serialize, Tabled)]
struct AssetRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Path")]
    path: String,
}

#[derive(Debug, Serialize)]
struct BuildSummary {
    build_id: String,
    output_path: String,
    stages: Vec<String>,
    assets: Vec<String>,
}

/// Execute the build command
pub async fn execute(args: &BuildArgs, config_path: &str, format: OutputFormat) -> AppResult<()> {
    let mut config = super::load_config(config_path)?;
    config.build.plugins.extend(args.plugins.iter().cloned());

    if config.build.plugins.is_empty() {
        output::print_warning("No plugins configured; stages will dispatch to no callbacks");
    }

    let compiler = Compiler::new(config)?.with_context_dir(&args.context);
    compiler.apply_plugins().await?;
    let outcome = compiler.run().await?;

    match format {
        OutputFormat::Table => print_table(&outcome),
        OutputFormat::Json => output::print_item(&summary(&outcome), format),
    }

    Ok(())
}

fn print_table(outcome: &BuildOutcome) {
    let rows: Vec<AssetRow> = outcome
        .assets
        .iter()
        .map(|asset| AssetRow {
            asset: asset.clone(),
            path: outcome.output_path.join(asset).display().to_string(),
        })
        .collect();

    output::print_success(&format!("Build {} finished", outcome.build_id));
    output::print_kv("Output", &outcome.output_path.display().to_string());
    output::print_kv("Stages", &outcome.reports.len().to_string());
    output::print_list(&rows, OutputFormat::Table);
}

fn summary(outcome: &BuildOutcome) -> BuildSummary {
    BuildSummary {
        build_id: outcome.build_id.to_string(),
        output_path: outcome.output_path.display().to_string(),
        stages: outcome.stages().iter().map(|s| s.to_string()).collect(),
        assets: outcome.assets.clone(),
    }
}
