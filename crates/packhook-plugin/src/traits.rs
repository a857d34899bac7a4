//! Closure-based hook handlers for quick handler creation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use packhook_core::AppResult;

use crate::hooks::definitions::StageContext;
use crate::hooks::registry::HookHandler;

type SyncFn = dyn Fn(&StageContext) -> AppResult<()> + Send + Sync;

type AsyncFn = dyn Fn(StageContext) -> Pin<Box<dyn Future<Output = AppResult<()>> + Send>>
    + Send
    + Sync;

/// A handler that returns as soon as the closure does.
pub struct SyncHandler {
    /// Tap name.
    name: String,
    /// Handler function.
    callback: Arc<SyncFn>,
}

impl std::fmt::Debug for SyncHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandler")
            .field("name", &self.name)
            .field("callback", &"<closure>")
            .finish()
    }
}

impl SyncHandler {
    /// Creates a new synchronous handler.
    pub fn new<F>(tap_name: &str, callback: F) -> Self
    where
        F: Fn(&StageContext) -> AppResult<()> + Send + Sync + 'static,
    {
        Self {
            name: tap_name.to_string(),
            callback: Arc::new(callback),
        }
    }
}

#[async_trait]
impl HookHandler for SyncHandler {
    async fn call(&self, ctx: &StageContext) -> AppResult<()> {
        (self.callback)(ctx)
    }

    fn tap_name(&self) -> &str {
        &self.name
    }
}

/// A handler whose closure returns a future that signals completion later.
///
/// The closure receives its own copy of the context so the future can
/// outlive the dispatcher's borrow.
pub struct AsyncHandler {
    /// Tap name.
    name: String,
    /// Handler function.
    callback: Arc<AsyncFn>,
}

impl std::fmt::Debug for AsyncHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncHandler")
            .field("name", &self.name)
            .field("callback", &"<closure>")
            .finish()
    }
}

impl AsyncHandler {
    /// Creates a new asynchronous handler.
    pub fn new<F, Fut>(tap_name: &str, callback: F) -> Self
    where
        F: Fn(StageContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<()>> + Send + 'static,
    {
        Self {
            name: tap_name.to_string(),
            callback: Arc::new(
                move |ctx: StageContext| -> Pin<Box<dyn Future<Output = AppResult<()>> + Send>> {
                    Box::pin(callback(ctx))
                },
            ),
        }
    }
}

#[async_trait]
impl HookHandler for AsyncHandler {
    async fn call(&self, ctx: &StageContext) -> AppResult<()> {
        (self.callback)(ctx.clone()).await
    }

    fn tap_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::hooks::definitions::Stage;
    use packhook_core::AppError;

    #[tokio::test]
    async fn test_sync_handler_passes_context() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        let handler = SyncHandler::new("counter", move |ctx: &StageContext| {
            let n = ctx.get_i64("n").unwrap_or_default() as usize;
            counter.fetch_add(n, Ordering::SeqCst);
            Ok(())
        });

        let ctx = StageContext::new(Stage::Make).with_int("n", 3);
        handler.call(&ctx).await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert_eq!(handler.tap_name(), "counter");
    }

    #[tokio::test]
    async fn test_async_handler_reports_failure() {
        let handler = AsyncHandler::new("failing", |ctx: StageContext| async move {
            tokio::task::yield_now().await;
            Err::<(), AppError>(AppError::io(format!("cannot list {}", ctx.stage())))
        });

        let err = handler
            .call(&StageContext::new(Stage::AfterEmit))
            .await
            .unwrap_err();
        assert_eq!(err.message, "cannot list after-emit");
    }
}
