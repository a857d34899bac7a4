//! Integration tests for plugins applied to a full build.

mod helpers;

use std::sync::Arc;

use packhook_core::config::AppConfig;
use packhook_plugin::prelude::*;
use packhook_plugin::PluginManager;
use plugin_file_list::FileListPlugin;
use plugin_log::LogPlugin;

const TWO_ENTRIES: &str = r#"
[build]
plugins = ["log", "file-list"]

[build.entry]
index = "src/index.js"
another = "src/another-module.js"
"#;

fn two_entry_project() -> helpers::TestProject {
    helpers::TestProject::new(&[
        ("src/index.js", "import './another-module.js';"),
        ("src/another-module.js", "export const n = 2;"),
    ])
}

#[tokio::test]
async fn test_build_writes_file_list() {
    let project = two_entry_project();
    let compiler = project.compiler(TWO_ENTRIES);
    compiler.apply_plugins().await.unwrap();

    let outcome = compiler.run().await.unwrap();

    assert_eq!(outcome.assets, vec!["another.bundle.js", "index.bundle.js"]);
    let list = std::fs::read_to_string(project.dist().join("filelist.md")).unwrap();
    assert_eq!(
        list,
        "In this build:\n\n- another.bundle.js\n- index.bundle.js\n"
    );
}

#[tokio::test]
async fn test_build_from_config_file() {
    let project = two_entry_project();
    let path = project.write_config(&format!(
        "[pipeline.dispatch]\nafter-emit = \"parallel\"\n{TWO_ENTRIES}"
    ));

    let config = AppConfig::load(path.to_str().unwrap()).unwrap();
    let compiler = packhook_compiler::Compiler::new(config)
        .unwrap()
        .with_context_dir(project.root());
    compiler.apply_plugins().await.unwrap();
    compiler.run().await.unwrap();

    assert!(project.dist().join("filelist.md").exists());
}

/// Records every stage it sees, the way a third-party plugin would.
#[derive(Debug)]
struct StageRecorder {
    seen: Arc<std::sync::Mutex<Vec<String>>>,
}

#[async_trait]
impl Plugin for StageRecorder {
    fn info(&self) -> PluginInfo {
        plugin_info!(
            id: "StageRecorder",
            name: "Stage recorder",
            version: "0.1.0",
            description: "Records dispatched stages",
            stages: [Stage::BeforeRun, Stage::Done]
        )
    }

    async fn apply(&self, hooks: &HookRegistry) -> AppResult<()> {
        for stage in [Stage::BeforeRun, Stage::Done] {
            let seen = self.seen.clone();
            hooks
                .tap(stage, "StageRecorder", move |ctx: &StageContext| {
                    seen.lock().unwrap().push(ctx.stage().to_string());
                    Ok(())
                })
                .await?;
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_custom_plugin_sees_its_stages() {
    let project = two_entry_project();
    let compiler = project.compiler(TWO_ENTRIES);
    let seen = helpers::output_log();

    compiler
        .apply(Arc::new(StageRecorder { seen: seen.clone() }))
        .await
        .unwrap();
    compiler.run().await.unwrap();

    assert_eq!(helpers::lines(&seen), vec!["before-run", "done"]);
}

#[tokio::test]
async fn test_unload_removes_only_that_plugins_taps() {
    let manager = PluginManager::new();
    manager.load_plugin(Arc::new(LogPlugin::new())).await.unwrap();
    manager
        .load_plugin(Arc::new(FileListPlugin::new()))
        .await
        .unwrap();

    manager.unload_plugin("LogPlugin").await.unwrap();

    let registry = manager.hook_registry();
    assert!(!registry.has_handlers(Stage::CompileStart).await);
    assert_eq!(
        registry.tap_names(Stage::AfterEmit).await,
        vec!["FileListPlugin"]
    );
    assert_eq!(manager.list_plugins().await.len(), 1);
}

#[tokio::test]
async fn test_loading_a_plugin_twice_conflicts() {
    let manager = PluginManager::new();
    manager.load_plugin(Arc::new(LogPlugin::new())).await.unwrap();

    let err = manager
        .load_plugin(Arc::new(LogPlugin::new()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, packhook_core::ErrorKind::Conflict);
    assert_eq!(manager.hook_registry().handler_count(Stage::CompileStart).await, 1);
}
