//! Convenience macros for plugin development.

/// Macro for creating a `PluginInfo`.
///
/// # Example
/// ```rust,ignore
/// let info = plugin_info!(
///     id: "LogPlugin",
///     name: "Log plugin",
///     version: "1.0.0",
///     description: "Logs compile parameters",
///     stages: [Stage::CompileStart]
/// );
/// ```
#[macro_export]
macro_rules! plugin_info {
    (
        id: $id:expr,
        name: $name:expr,
        version: $version:expr,
        description: $desc:expr,
        stages: [$($stage:expr),* $(,)?]
    ) => {
        $crate::registry::PluginInfo {
            id: $id.to_string(),
            name: $name.to_string(),
            version: $version.to_string(),
            description: $desc.to_string(),
            stages: vec![$($stage.to_string()),*],
        }
    };
}

/// Macro for quickly building a `StageContext`.
///
/// # Example
/// ```rust,ignore
/// let ctx = stage_context!(Stage::Emit, {
///     "output_path" => json!("dist"),
///     "assets" => json!(["index.bundle.js"]),
/// });
/// ```
#[macro_export]
macro_rules! stage_context {
    ($stage:expr) => {
        $crate::hooks::definitions::StageContext::new($stage)
    };
    ($stage:expr, { $($key:expr => $value:expr),* $(,)? }) => {{
        let ctx = $crate::hooks::definitions::StageContext::new($stage);
        $(
            let ctx = ctx.with_data($key, $value);
        )*
        ctx
    }};
}
