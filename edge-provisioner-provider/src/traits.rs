use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    DnsRecord, DnsRecordSpec, ForwardingRule, HttpsMode, IpVisibilityMode, PageruleSpec,
    PaginatedResponse, PaginationParams, ProviderZone, SslMode,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// Zone 名称或 ID（用于 `ZoneAlreadyExists`、`NameserverCheckThrottled` 等错误）
    pub zone: Option<String>,
}

impl ErrorContext {
    pub fn zone(zone: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            ..Self::default()
        }
    }

    pub fn record(zone: impl Into<String>, record_name: impl Into<String>) -> Self {
        Self {
            zone: Some(zone.into()),
            record_name: Some(record_name.into()),
            record_id: None,
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Edge provider capability set consumed by the provisioning workflows.
///
/// Covers zone lifecycle, zone security settings, DNS records, URL-forwarding
/// rules and the nameserver verification trigger. The `reset_*` and
/// `update_forwarding_rules` operations have default implementations built on
/// the list/delete/update primitives; providers with native bulk endpoints may
/// override them.
#[async_trait]
pub trait EdgeProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 验证凭证是否有效
    async fn validate_credentials(&self) -> Result<bool>;

    // ---- Zones ----

    /// Register a new zone under `account_id`.
    async fn create_zone(&self, name: &str, account_id: &str) -> Result<ProviderZone>;

    /// Fetch a single zone.
    async fn get_zone(&self, zone_id: &str) -> Result<ProviderZone>;

    /// List zones visible to the credentials (paginated).
    async fn list_zones(&self, params: &PaginationParams)
    -> Result<PaginatedResponse<ProviderZone>>;

    // ---- Security settings ----

    /// Set the edge-to-origin SSL mode.
    async fn set_ssl_mode(&self, zone_id: &str, mode: SslMode) -> Result<()>;

    /// Set how the client IP is exposed to the origin.
    async fn set_ip_visibility_mode(&self, zone_id: &str, mode: IpVisibilityMode) -> Result<()>;

    /// Toggle the HTTP → HTTPS redirect.
    async fn set_https_mode(&self, zone_id: &str, mode: HttpsMode) -> Result<()>;

    // ---- DNS records ----

    /// List every DNS record of the zone.
    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>>;

    /// Delete one DNS record.
    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// Create a DNS record.
    async fn create_dns_record(&self, spec: &DnsRecordSpec) -> Result<DnsRecord>;

    /// Point the existing record named `spec.name` at `spec.content`.
    async fn update_dns_record(&self, spec: &DnsRecordSpec) -> Result<DnsRecord>;

    /// Delete every DNS record of the zone.
    ///
    /// All deletions are attempted; the first failure (in listing order) is returned.
    async fn reset_dns_records(&self, zone_id: &str) -> Result<()> {
        let records = self.list_dns_records(zone_id).await?;
        let deletions: Vec<_> = records
            .iter()
            .map(|record| self.delete_dns_record(zone_id, &record.id))
            .collect();
        let results = futures::future::join_all(deletions).await;

        first_failure(results, || {
            log::debug!("[{}] Removed {} DNS records from {zone_id}", self.id(), records.len());
        })
    }

    // ---- Forwarding rules ----

    /// List every forwarding (page) rule of the zone.
    async fn list_forwarding_rules(&self, zone_id: &str) -> Result<Vec<ForwardingRule>>;

    /// Delete one forwarding rule.
    async fn delete_forwarding_rule(&self, zone_id: &str, rule_id: &str) -> Result<()>;

    /// Create a forwarding rule.
    async fn create_forwarding_rule(&self, spec: &PageruleSpec) -> Result<ForwardingRule>;

    /// Replace an existing forwarding rule.
    async fn update_forwarding_rule(
        &self,
        rule_id: &str,
        spec: &PageruleSpec,
    ) -> Result<ForwardingRule>;

    /// Delete every forwarding rule of the zone.
    ///
    /// All deletions are attempted; the first failure (in listing order) is returned.
    async fn reset_forwarding_rules(&self, zone_id: &str) -> Result<()> {
        let rules = self.list_forwarding_rules(zone_id).await?;
        let deletions: Vec<_> = rules
            .iter()
            .map(|rule| self.delete_forwarding_rule(zone_id, &rule.id))
            .collect();
        let results = futures::future::join_all(deletions).await;

        first_failure(results, || {
            log::debug!("[{}] Removed {} page rules from {zone_id}", self.id(), rules.len());
        })
    }

    /// Point every forwarding rule of the zone at `forwarding_url`.
    ///
    /// Each rule keeps its matched URL and status code. Page rules without a
    /// forwarding action are left alone.
    async fn update_forwarding_rules(&self, zone_id: &str, forwarding_url: &str) -> Result<()> {
        let rules: Vec<ForwardingRule> = self
            .list_forwarding_rules(zone_id)
            .await?
            .into_iter()
            .filter(|rule| rule.forwarding_url.is_some())
            .collect();
        let updates: Vec<_> = rules
            .iter()
            .map(|rule| {
                let spec = PageruleSpec::new(zone_id, rule.url.clone(), forwarding_url)
                    .with_status_code(
                        rule.status_code
                            .unwrap_or(crate::types::DEFAULT_FORWARDING_STATUS),
                    );
                async move { self.update_forwarding_rule(&rule.id, &spec).await }
            })
            .collect();
        let results = futures::future::join_all(updates).await;

        first_failure(results, || {
            log::debug!("[{}] Updated {} page rules on {zone_id}", self.id(), rules.len());
        })
    }

    // ---- Nameservers ----

    /// Ask the provider to re-check the zone's nameserver delegation.
    async fn check_nameservers(&self, zone_id: &str) -> Result<()>;
}

/// Collapse fan-out results into the first error, running `on_success` when all succeeded.
fn first_failure<T>(results: Vec<Result<T>>, on_success: impl FnOnce()) -> Result<()> {
    let mut failures = results.into_iter().filter_map(std::result::Result::err);
    match failures.next() {
        Some(first) => {
            let remaining = failures.count();
            if remaining > 0 {
                log::warn!("{first} (and {remaining} more failures)");
            }
            Err(first)
        }
        None => {
            on_success();
            Ok(())
        }
    }
}
