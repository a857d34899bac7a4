//! Integration tests for registration and dispatch.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use packhook_core::config::{AppConfig, DispatchMode};
use packhook_core::{AppError, ErrorKind};
use packhook_plugin::{HookDispatcher, HookRegistry, PluginManager, Stage, StageContext};

const SINGLE_ENTRY: &str = r#"
[build.entry]
index = "src/index.js"
"#;

#[tokio::test]
async fn test_callbacks_run_in_registration_order() {
    let registry = Arc::new(HookRegistry::new());
    let out = helpers::output_log();

    for (name, line) in [("A", "first"), ("B", "second")] {
        let sink = out.clone();
        registry
            .tap("compile-start", name, move |_ctx: &StageContext| {
                sink.lock().unwrap().push(line.to_string());
                Ok(())
            })
            .await
            .unwrap();
    }

    let dispatcher = HookDispatcher::new(registry);
    let report = dispatcher
        .dispatch(&StageContext::new(Stage::CompileStart))
        .await
        .unwrap();

    assert_eq!(helpers::lines(&out), vec!["first", "second"]);
    assert_eq!(report.invoked, vec!["A", "B"]);
}

#[tokio::test]
async fn test_unknown_stage_is_rejected() {
    let registry = HookRegistry::new();

    let err = registry
        .tap("compile-finish", "Typo", |_ctx: &StageContext| Ok(()))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidStage);
    assert!(err.message.contains("compile-finish"));
    assert!(registry.registered_stages().await.is_empty());
}

#[tokio::test]
async fn test_failing_emit_callback_halts_stage() {
    let registry = Arc::new(HookRegistry::new());
    let out = helpers::output_log();

    registry
        .tap(Stage::Emit, "Thrower", |_ctx: &StageContext| {
            Err(AppError::internal("disk full"))
        })
        .await
        .unwrap();
    let sink = out.clone();
    registry
        .tap(Stage::Emit, "After", move |_ctx: &StageContext| {
            sink.lock().unwrap().push("after".to_string());
            Ok(())
        })
        .await
        .unwrap();

    let err = HookDispatcher::new(registry)
        .dispatch(&StageContext::new(Stage::Emit))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::CallbackFailure);
    assert!(err.message.contains("Thrower"));
    assert!(err.message.contains("emit"));
    assert!(helpers::lines(&out).is_empty());
}

#[tokio::test]
async fn test_dispatch_without_callbacks_is_noop() {
    let dispatcher = HookDispatcher::new(Arc::new(HookRegistry::new()));

    let report = dispatcher
        .dispatch(&StageContext::new(Stage::Done))
        .await
        .unwrap();

    assert_eq!(report.handler_count(), 0);
}

#[tokio::test]
async fn test_async_callback_finishes_before_next_starts() {
    let registry = Arc::new(HookRegistry::new());
    let out = helpers::output_log();

    let sink = out.clone();
    registry
        .tap_async(Stage::AfterEmit, "Slow", move |_ctx: StageContext| {
            let sink = sink.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                sink.lock().unwrap().push("slow".to_string());
                Ok::<(), AppError>(())
            }
        })
        .await
        .unwrap();
    let sink = out.clone();
    registry
        .tap(Stage::AfterEmit, "Fast", move |_ctx: &StageContext| {
            sink.lock().unwrap().push("fast".to_string());
            Ok(())
        })
        .await
        .unwrap();

    HookDispatcher::new(registry)
        .dispatch(&StageContext::new(Stage::AfterEmit))
        .await
        .unwrap();

    assert_eq!(helpers::lines(&out), vec!["slow", "fast"]);
}

#[tokio::test]
async fn test_dispatch_modes_come_from_config() {
    let config = AppConfig::from_toml_str(&format!(
        "[pipeline.dispatch]\nafter-emit = \"parallel\"\n{SINGLE_ENTRY}"
    ))
    .unwrap();

    let manager = PluginManager::with_config(&config.pipeline).unwrap();

    assert_eq!(manager.dispatcher().mode(Stage::AfterEmit), DispatchMode::Parallel);
    assert_eq!(manager.dispatcher().mode(Stage::Emit), DispatchMode::Sequential);
}

#[tokio::test]
async fn test_unknown_stage_in_config_is_rejected() {
    let config = AppConfig::from_toml_str(&format!(
        "[pipeline.dispatch]\nseal = \"parallel\"\n{SINGLE_ENTRY}"
    ))
    .unwrap();

    let err = PluginManager::with_config(&config.pipeline).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidStage);
}

#[tokio::test]
async fn test_failed_stage_receives_the_error() {
    let project = helpers::TestProject::new(&[("src/index.js", "export default 1;")]);
    let compiler = project.compiler(SINGLE_ENTRY);
    let out = helpers::output_log();

    let sink = out.clone();
    let hooks = compiler.manager().hook_registry();
    hooks
        .tap(Stage::Failed, "Reporter", move |ctx: &StageContext| {
            sink.lock()
                .unwrap()
                .push(ctx.get_string("error").unwrap_or_default().to_string());
            Ok(())
        })
        .await
        .unwrap();
    hooks
        .tap(Stage::Emit, "Thrower", |_ctx: &StageContext| {
            Err(AppError::internal("emit refused"))
        })
        .await
        .unwrap();

    let err = compiler.run().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::CallbackFailure);
    let reported = helpers::lines(&out);
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains("Thrower"));
    assert!(!project.dist().exists());
}
