//! `packhook plugins`: list builtin plugins.

use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use packhook_compiler::BUILTIN_PLUGINS;
use packhook_core::AppResult;

#[derive(Debug, Serialize, Tabled)]
struct PluginRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Stage")]
    stage: &'static str,
    #[tabled(rename = "Description")]
    description: &'static str,
}

/// Execute the plugins command
pub fn execute(format: OutputFormat) -> AppResult<()> {
    let rows: Vec<PluginRow> = BUILTIN_PLUGINS
        .iter()
        .map(|p| PluginRow {
            name: p.name,
            stage: p.stage,
            description: p.description,
        })
        .collect();

    output::print_list(&rows, format);
    Ok(())
}
