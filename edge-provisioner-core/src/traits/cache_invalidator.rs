//! Response cache invalidation hook

use async_trait::async_trait;

use crate::error::CoreResult;

/// Invalidates server-side response caches after a clean provisioning run.
///
/// Workflows only call it when every step succeeded; an invalidation failure is
/// logged and never changes the workflow result.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self) -> CoreResult<()>;
}
