//! `CacheInvalidator` implementation for frontends without a cache.

use async_trait::async_trait;

use edge_provisioner_core::error::CoreResult;
use edge_provisioner_core::traits::CacheInvalidator;

/// For frontends without a response cache.
pub struct NoopCacheInvalidator;

#[async_trait]
impl CacheInvalidator for NoopCacheInvalidator {
    async fn invalidate(&self) -> CoreResult<()> {
        Ok(())
    }
}
