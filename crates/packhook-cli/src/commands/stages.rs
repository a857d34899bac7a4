//! `packhook stages`: list the pipeline stages.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use packhook_compiler::Compiler;
use packhook_core::AppResult;
use packhook_plugin::Stage;

#[derive(Debug, Serialize, Tabled)]
struct StageRow {
    #[tabled(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Taps")]
    taps: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// Execute the stages command
///
/// Configured plugins are applied so the taps column shows who listens where.
pub async fn execute(config_path: &str, format: OutputFormat) -> AppResult<()> {
    let config = super::load_config(config_path)?;
    let compiler = Compiler::new(config)?;
    compiler.apply_plugins().await?;

    let registry = compiler.manager().hook_registry();
    let dispatcher = compiler.manager().dispatcher();

    let mut rows = Vec::with_capacity(Stage::ALL.len());
    for stage in Stage::ALL {
        rows.push(StageRow {
            stage: stage.to_string(),
            mode: dispatcher.mode(stage).to_string(),
            taps: registry.tap_names(stage).await.join(", "),
            description: stage.description().to_string(),
        });
    }

    output::print_list(&rows, format);
    Ok(())
}
