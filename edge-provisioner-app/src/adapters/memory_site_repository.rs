//! In-memory `SiteRepository`.

use async_trait::async_trait;
use tokio::sync::RwLock;

use edge_provisioner_core::error::CoreResult;
use edge_provisioner_core::traits::SiteRepository;
use edge_provisioner_core::types::Site;

/// Keeps sites in registration order for the lifetime of the process.
#[derive(Default)]
pub struct InMemorySiteRepository {
    sites: RwLock<Vec<Site>>,
}

impl InMemorySiteRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SiteRepository for InMemorySiteRepository {
    async fn find_all(&self) -> CoreResult<Vec<Site>> {
        Ok(self.sites.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>> {
        Ok(self.sites.read().await.iter().find(|s| s.id == id).cloned())
    }

    async fn save(&self, site: &Site) -> CoreResult<()> {
        let mut sites = self.sites.write().await;
        match sites.iter_mut().find(|s| s.id == site.id) {
            Some(existing) => *existing = site.clone(),
            None => sites.push(site.clone()),
        }
        Ok(())
    }
}
