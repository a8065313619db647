//! 站点查询服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{PaginatedResponse, PaginationParams, ProviderZone, Site};

/// 站点查询服务
pub struct SiteService {
    ctx: Arc<ServiceContext>,
}

impl SiteService {
    /// 创建站点服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 列出本地登记的所有站点
    pub async fn list_sites(&self) -> CoreResult<Vec<Site>> {
        self.ctx.site_repository.find_all().await
    }

    /// 获取站点详情
    pub async fn get_site(&self, site_id: &str) -> CoreResult<Site> {
        self.ctx
            .site_repository
            .find_by_id(site_id)
            .await?
            .ok_or_else(|| CoreError::SiteNotFound(site_id.to_string()))
    }

    /// 从 provider 刷新 zone 状态和 nameserver，并写回仓库
    pub async fn refresh_status(&self, site_id: &str) -> CoreResult<Site> {
        let mut site = self.get_site(site_id).await?;
        let zone = self.ctx.provider.get_zone(&site.id).await?;

        if zone.status != site.status {
            log::info!(
                "Site {} status changed: {} -> {}",
                site.name,
                site.status.as_str(),
                zone.status.as_str()
            );
        }
        site.status = zone.status;
        site.name_servers = zone.name_servers;

        self.ctx.site_repository.save(&site).await?;
        Ok(site)
    }

    /// 列出 provider 账户下的 zone（分页）
    pub async fn list_remote_zones(
        &self,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> CoreResult<PaginatedResponse<ProviderZone>> {
        let params = PaginationParams {
            page: page.unwrap_or(1),
            page_size: page_size.unwrap_or(20),
        };
        Ok(self.ctx.provider.list_zones(&params).await?)
    }
}
