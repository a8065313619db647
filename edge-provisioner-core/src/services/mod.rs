//! 业务逻辑服务层

mod create_site_workflow;
mod error_aggregator;
mod nameserver_check_guard;
mod site_locks;
mod site_service;
mod update_site_workflow;

pub use create_site_workflow::CreateSiteWorkflow;
pub use error_aggregator::ErrorAggregator;
pub use nameserver_check_guard::NameserverCheckGuard;
pub use site_locks::SiteLocks;
pub use site_service::SiteService;
pub use update_site_workflow::UpdateSiteWorkflow;

use std::sync::Arc;

use edge_provisioner_provider::EdgeProvider;

use crate::config::ProvisionerConfig;
use crate::traits::{CacheInvalidator, SiteRepository};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现。
pub struct ServiceContext {
    /// Edge provider 客户端
    pub provider: Arc<dyn EdgeProvider>,
    /// 站点持久化仓库
    pub site_repository: Arc<dyn SiteRepository>,
    /// 响应缓存失效钩子
    pub cache_invalidator: Arc<dyn CacheInvalidator>,
    /// 预配参数
    pub config: ProvisionerConfig,
    /// 同一站点的并发运行互斥
    pub locks: SiteLocks,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        provider: Arc<dyn EdgeProvider>,
        site_repository: Arc<dyn SiteRepository>,
        cache_invalidator: Arc<dyn CacheInvalidator>,
        config: ProvisionerConfig,
    ) -> Self {
        Self {
            provider,
            site_repository,
            cache_invalidator,
            config,
            locks: SiteLocks::default(),
        }
    }

    /// 清除响应缓存；失败只记录日志
    pub async fn invalidate_cache(&self) {
        match self.cache_invalidator.invalidate().await {
            Ok(()) => log::debug!("Response cache invalidated"),
            Err(e) if e.is_expected() => log::warn!("Cache invalidation failed: {e}"),
            Err(e) => log::error!("Cache invalidation failed: {e}"),
        }
    }
}
