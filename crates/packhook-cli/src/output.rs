//! Terminal output for CLI commands.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Print rows as a table, or as a JSON array.
pub fn print_list<T: Serialize + Tabled>(rows: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table if rows.is_empty() => println!("Nothing to show."),
        OutputFormat::Table => {
            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{table}");
        }
        OutputFormat::Json => print_json(&rows),
    }
}

/// Print one value, debug-formatted for tables.
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => println!("{item:#?}"),
        OutputFormat::Json => print_json(item),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => print_error(&format!("Cannot render JSON: {e}")),
    }
}

/// Print a success line.
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning line.
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error line to stderr.
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print an indented `key: value` pair.
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<18} {}", format!("{key}:"), value);
}
