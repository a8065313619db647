//! Site persistence abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Site;

/// Site repository Trait
///
/// Platform implementation:
/// - `InMemorySiteRepository` (app crate)
/// - `SqliteStore` (app crate, `sqlite-store` feature, `SeaORM`)
#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Get all sites, in registration order
    async fn find_all(&self) -> CoreResult<Vec<Site>>;

    /// Get site based on ID
    ///
    /// # Arguments
    /// * `id` - Zone ID
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>>;

    /// Save site (new or update)
    ///
    /// # Arguments
    /// * `site` - Site data
    async fn save(&self, site: &Site) -> CoreResult<()>;
}
