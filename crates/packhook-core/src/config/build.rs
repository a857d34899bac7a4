//! Static build configuration: entries, output, library export, and the
//! options a host bundler would consume.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Placeholders `output.filename` may contain.
pub const SUPPORTED_PLACEHOLDERS: &[&str] = &["name", "id"];

/// Build mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Readable output with better debugging support.
    #[default]
    Development,
    /// Optimized output.
    Production,
    /// No mode-specific defaults.
    None,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Module format a library bundle is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LibraryTarget {
    /// Assigned to a global variable.
    #[serde(rename = "var")]
    Var,
    /// Assigned to `exports`.
    #[serde(rename = "commonjs")]
    CommonJs,
    /// Assigned to `module.exports`.
    #[serde(rename = "commonjs2")]
    CommonJs2,
    /// AMD `define`.
    #[serde(rename = "amd")]
    Amd,
    /// Universal module definition.
    #[serde(rename = "umd")]
    Umd,
}

/// Which chunks the split-chunks optimization considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitChunks {
    /// Both initial and async chunks.
    All,
    /// Only chunks loaded on demand.
    Async,
    /// Only entry chunks.
    Initial,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory assets are written to.
    #[serde(default = "default_output_path")]
    pub path: String,
    /// Filename template for entry assets.
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Filename template for non-entry chunks.
    #[serde(default)]
    pub chunk_filename: Option<String>,
    /// Global name a library bundle is exported under.
    #[serde(default)]
    pub library: Option<String>,
    /// How the library is exposed.
    #[serde(default)]
    pub library_target: Option<LibraryTarget>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            filename: default_filename(),
            chunk_filename: None,
            library: None,
            library_target: None,
        }
    }
}

/// Names an external dependency resolves to under each module format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalTargets {
    /// Name under `commonjs`.
    #[serde(default)]
    pub commonjs: Option<String>,
    /// Name under `commonjs2`.
    #[serde(default)]
    pub commonjs2: Option<String>,
    /// Name under `amd`.
    #[serde(default)]
    pub amd: Option<String>,
    /// Global name.
    #[serde(default)]
    pub root: Option<String>,
}

/// Optimization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptimizationConfig {
    /// Split-chunks selection.
    #[serde(default)]
    pub split_chunks: Option<SplitChunksConfig>,
    /// Extract the runtime into its own chunk (`"single"`).
    #[serde(default)]
    pub runtime_chunk: Option<String>,
}

/// Split-chunks settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitChunksConfig {
    /// Which chunks to consider.
    pub chunks: SplitChunks,
}

/// Development server settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevServerConfig {
    /// Directory static content is served from.
    #[serde(default)]
    pub content_base: Option<String>,
}

/// The full static build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Build mode.
    #[serde(default)]
    pub mode: Mode,
    /// Entry name → module path. Ordered by name.
    #[serde(default)]
    pub entry: BTreeMap<String, String>,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Dependencies left out of the bundle.
    #[serde(default)]
    pub externals: BTreeMap<String, ExternalTargets>,
    /// Source map style, e.g. `inline-source-map`.
    #[serde(default)]
    pub devtool: Option<String>,
    /// Optimization settings.
    #[serde(default)]
    pub optimization: OptimizationConfig,
    /// Development server settings.
    #[serde(default)]
    pub dev_server: Option<DevServerConfig>,
    /// Builtin plugins to apply, in order.
    #[serde(default)]
    pub plugins: Vec<String>,
}

impl BuildConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.entry.is_empty() {
            return Err(AppError::validation("build.entry must name at least one entry"));
        }

        if let Some((name, _)) = self.entry.iter().find(|(_, path)| path.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "build.entry.{name} has an empty module path"
            )));
        }

        validate_template("build.output.filename", &self.output.filename)?;
        if let Some(ref chunk_filename) = self.output.chunk_filename {
            validate_template("build.output.chunk_filename", chunk_filename)?;
        }

        if self.output.library_target.is_some() && self.output.library.is_none() {
            return Err(AppError::validation(
                "build.output.library_target requires build.output.library",
            ));
        }

        Ok(())
    }

    /// Returns `(entry name, asset filename)` for every entry, in entry order.
    pub fn asset_names(&self) -> Vec<(String, String)> {
        self.entry
            .keys()
            .enumerate()
            .map(|(id, name)| (name.clone(), render_filename(&self.output.filename, name, id)))
            .collect()
    }
}

/// Substitutes `[name]` and `[id]` in a filename template.
pub fn render_filename(template: &str, name: &str, id: usize) -> String {
    template
        .replace("[name]", name)
        .replace("[id]", &id.to_string())
}

fn validate_template(field: &str, template: &str) -> Result<(), AppError> {
    if template.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }

    let escapes = Path::new(template).components().any(|c| {
        matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes {
        return Err(AppError::validation(format!(
            "{field} must stay inside build.output.path, got '{template}'"
        )));
    }

    for placeholder in placeholders(template) {
        if !SUPPORTED_PLACEHOLDERS.contains(&placeholder) {
            return Err(AppError::validation(format!(
                "{field} uses unsupported placeholder '[{placeholder}]'"
            )));
        }
    }

    Ok(())
}

fn placeholders(template: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('[') {
        let after = &rest[start + 1..];
        match after.find(']') {
            Some(end) => {
                found.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    found
}

fn default_output_path() -> String {
    "dist".to_string()
}

fn default_filename() -> String {
    "[name].bundle.js".to_string()
}
