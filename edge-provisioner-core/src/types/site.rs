//! 站点相关类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use edge_provisioner_provider::{ProviderZone, ZoneStatus};

/// 已预配的站点（一个 zone）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    /// Provider 分配的 zone ID
    pub id: String,
    /// 域名
    pub name: String,
    /// 所属账户 ID
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// 创建时 provider 报告的 zone 状态
    pub status: ZoneStatus,
    /// Provider 分配的 nameserver
    #[serde(rename = "nameServers", default)]
    pub name_servers: Vec<String>,
    /// 本地登记时间
    #[serde(rename = "createdAt")]
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl Site {
    /// 从新建的 zone 构造站点
    ///
    /// The site always records the configured `account_id`, whatever the
    /// provider reports.
    pub fn from_zone(zone: ProviderZone, account_id: &str) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            account_id: account_id.to_string(),
            status: zone.status,
            name_servers: zone.name_servers,
            created_at: Utc::now(),
        }
    }

    /// `www` 子域名
    pub fn www_name(&self) -> String {
        format!("www.{}", self.name)
    }
}

/// 创建站点请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSiteRequest {
    /// 要注册的域名
    pub name: String,
    /// 根记录 (`@`) 目标
    pub root_target: String,
    /// `www` 记录目标
    pub sub_target: String,
    /// 根域名转发规则匹配的 URL（如 `example.com/*`）
    pub pagerule_url: String,
    /// `www` 转发规则匹配的 URL（如 `www.example.com/*`）
    pub pagerule_full_url: String,
    /// 转发目标
    pub forwarding_url: String,
}

/// 更新站点请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteRequest {
    /// 站点 ID
    pub site_id: String,
    /// 新的根记录目标
    pub root_target: String,
    /// 新的 `www` 记录目标
    pub sub_target: String,
    /// 新的转发目标
    #[serde(default)]
    pub forwarding_url: Option<String>,
    /// 调用方是否声明提供了转发目标（提供了但为空时请求被拒绝）
    #[serde(default)]
    pub forwarding_url_was_provided: bool,
}

impl UpdateSiteRequest {
    /// 只更新 DNS 目标
    pub fn new(
        site_id: impl Into<String>,
        root_target: impl Into<String>,
        sub_target: impl Into<String>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            root_target: root_target.into(),
            sub_target: sub_target.into(),
            forwarding_url: None,
            forwarding_url_was_provided: false,
        }
    }

    /// 同时更新转发目标
    #[must_use]
    pub fn with_forwarding_url(mut self, forwarding_url: impl Into<String>) -> Self {
        self.forwarding_url = Some(forwarding_url.into());
        self.forwarding_url_was_provided = true;
        self
    }
}
