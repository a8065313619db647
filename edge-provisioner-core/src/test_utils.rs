//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use edge_provisioner_provider::{
    DnsRecord, DnsRecordSpec, EdgeProvider, ForwardingRule, HttpsMode, IpVisibilityMode,
    PageruleSpec, PaginatedResponse, PaginationParams, ProviderError, ProviderZone,
    Result as ProviderResult, SslMode, ZoneStatus,
};
use tokio::sync::RwLock;

use crate::config::ProvisionerConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{CacheInvalidator, SiteRepository};
use crate::types::{CreateSiteRequest, Site};

// ===== MockEdgeProvider =====

/// Provider operations recorded by [`MockEdgeProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    CreateZone,
    GetZone,
    ListZones,
    SetSslMode,
    SetIpVisibility,
    SetHttpsMode,
    ResetDnsRecords,
    CreateDnsRecord,
    UpdateDnsRecord,
    ResetForwardingRules,
    CreateForwardingRule,
    UpdateForwardingRules,
    CheckNameservers,
}

#[derive(Default)]
struct MockState {
    calls: Vec<MockOp>,
    failures: HashMap<MockOp, ProviderError>,
    zone_status: Option<ZoneStatus>,
    created_records: Vec<DnsRecordSpec>,
    updated_records: Vec<DnsRecordSpec>,
    created_rules: Vec<PageruleSpec>,
    forwarding_updates: Vec<(String, String)>,
    ssl_modes: Vec<SslMode>,
}

/// In-memory provider: records every call and fails the ones registered with [`fail_on`](Self::fail_on).
#[derive(Default)]
pub struct MockEdgeProvider {
    state: RwLock<MockState>,
}

impl MockEdgeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later call of `op` returns `error`.
    pub async fn fail_on(&self, op: MockOp, error: ProviderError) {
        self.state.write().await.failures.insert(op, error);
    }

    pub async fn set_zone_status(&self, status: ZoneStatus) {
        self.state.write().await.zone_status = Some(status);
    }

    pub async fn calls(&self) -> Vec<MockOp> {
        self.state.read().await.calls.clone()
    }

    pub async fn created_records(&self) -> Vec<DnsRecordSpec> {
        self.state.read().await.created_records.clone()
    }

    pub async fn updated_records(&self) -> Vec<DnsRecordSpec> {
        self.state.read().await.updated_records.clone()
    }

    pub async fn created_rules(&self) -> Vec<PageruleSpec> {
        self.state.read().await.created_rules.clone()
    }

    pub async fn forwarding_updates(&self) -> Vec<(String, String)> {
        self.state.read().await.forwarding_updates.clone()
    }

    pub async fn ssl_modes(&self) -> Vec<SslMode> {
        self.state.read().await.ssl_modes.clone()
    }

    async fn record(&self, op: MockOp) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        state.calls.push(op);
        match state.failures.get(&op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn zone(id: &str, name: &str, status: ZoneStatus) -> ProviderZone {
        ProviderZone {
            id: id.to_string(),
            name: name.to_string(),
            account_id: None,
            status,
            name_servers: vec![
                "ada.ns.cloudflare.com".to_string(),
                "bob.ns.cloudflare.com".to_string(),
            ],
        }
    }
}

#[async_trait]
impl EdgeProvider for MockEdgeProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn validate_credentials(&self) -> ProviderResult<bool> {
        Ok(true)
    }

    async fn create_zone(&self, name: &str, _account_id: &str) -> ProviderResult<ProviderZone> {
        self.record(MockOp::CreateZone).await?;
        Ok(Self::zone(&format!("zone-{name}"), name, ZoneStatus::Pending))
    }

    async fn get_zone(&self, zone_id: &str) -> ProviderResult<ProviderZone> {
        self.record(MockOp::GetZone).await?;
        let status = self
            .state
            .read()
            .await
            .zone_status
            .clone()
            .unwrap_or(ZoneStatus::Pending);
        Ok(Self::zone(zone_id, "example.com", status))
    }

    async fn list_zones(
        &self,
        params: &PaginationParams,
    ) -> ProviderResult<PaginatedResponse<ProviderZone>> {
        self.record(MockOp::ListZones).await?;
        Ok(PaginatedResponse::new(
            Vec::new(),
            params.page,
            params.page_size,
            0,
        ))
    }

    async fn set_ssl_mode(&self, _zone_id: &str, mode: SslMode) -> ProviderResult<()> {
        self.record(MockOp::SetSslMode).await?;
        self.state.write().await.ssl_modes.push(mode);
        Ok(())
    }

    async fn set_ip_visibility_mode(
        &self,
        _zone_id: &str,
        _mode: IpVisibilityMode,
    ) -> ProviderResult<()> {
        self.record(MockOp::SetIpVisibility).await
    }

    async fn set_https_mode(&self, _zone_id: &str, _mode: HttpsMode) -> ProviderResult<()> {
        self.record(MockOp::SetHttpsMode).await
    }

    async fn list_dns_records(&self, _zone_id: &str) -> ProviderResult<Vec<DnsRecord>> {
        Ok(Vec::new())
    }

    async fn delete_dns_record(&self, _zone_id: &str, _record_id: &str) -> ProviderResult<()> {
        Ok(())
    }

    async fn create_dns_record(&self, spec: &DnsRecordSpec) -> ProviderResult<DnsRecord> {
        self.record(MockOp::CreateDnsRecord).await?;
        self.state.write().await.created_records.push(spec.clone());
        Ok(DnsRecord {
            id: format!("rec-{}", spec.name),
            site_id: spec.site_id.clone(),
            record_type: spec.record_type.as_str().to_string(),
            name: spec.name.clone(),
            content: spec.content.clone(),
            proxied: Some(spec.proxied),
        })
    }

    async fn update_dns_record(&self, spec: &DnsRecordSpec) -> ProviderResult<DnsRecord> {
        self.record(MockOp::UpdateDnsRecord).await?;
        self.state.write().await.updated_records.push(spec.clone());
        Ok(DnsRecord {
            id: format!("rec-{}", spec.name),
            site_id: spec.site_id.clone(),
            record_type: spec.record_type.as_str().to_string(),
            name: spec.name.clone(),
            content: spec.content.clone(),
            proxied: Some(spec.proxied),
        })
    }

    async fn reset_dns_records(&self, _zone_id: &str) -> ProviderResult<()> {
        self.record(MockOp::ResetDnsRecords).await
    }

    async fn list_forwarding_rules(&self, _zone_id: &str) -> ProviderResult<Vec<ForwardingRule>> {
        Ok(Vec::new())
    }

    async fn delete_forwarding_rule(&self, _zone_id: &str, _rule_id: &str) -> ProviderResult<()> {
        Ok(())
    }

    async fn create_forwarding_rule(&self, spec: &PageruleSpec) -> ProviderResult<ForwardingRule> {
        self.record(MockOp::CreateForwardingRule).await?;
        self.state.write().await.created_rules.push(spec.clone());
        Ok(ForwardingRule {
            id: format!("rule-{}", spec.url),
            site_id: spec.site_id.clone(),
            url: spec.url.clone(),
            forwarding_url: Some(spec.forwarding_url.clone()),
            status_code: Some(spec.status_code),
        })
    }

    async fn update_forwarding_rule(
        &self,
        rule_id: &str,
        spec: &PageruleSpec,
    ) -> ProviderResult<ForwardingRule> {
        Ok(ForwardingRule {
            id: rule_id.to_string(),
            site_id: spec.site_id.clone(),
            url: spec.url.clone(),
            forwarding_url: Some(spec.forwarding_url.clone()),
            status_code: Some(spec.status_code),
        })
    }

    async fn reset_forwarding_rules(&self, _zone_id: &str) -> ProviderResult<()> {
        self.record(MockOp::ResetForwardingRules).await
    }

    async fn update_forwarding_rules(
        &self,
        zone_id: &str,
        forwarding_url: &str,
    ) -> ProviderResult<()> {
        self.record(MockOp::UpdateForwardingRules).await?;
        self.state
            .write()
            .await
            .forwarding_updates
            .push((zone_id.to_string(), forwarding_url.to_string()));
        Ok(())
    }

    async fn check_nameservers(&self, _zone_id: &str) -> ProviderResult<()> {
        self.record(MockOp::CheckNameservers).await
    }
}

// ===== MockSiteRepository =====

pub struct MockSiteRepository {
    sites: RwLock<Vec<Site>>,
    /// 如果 Some，save 时返回此错误（用于测试持久化失败路径）
    save_error: RwLock<Option<String>>,
    reads: AtomicUsize,
}

impl MockSiteRepository {
    pub fn new() -> Self {
        Self {
            sites: RwLock::new(Vec::new()),
            save_error: RwLock::new(None),
            reads: AtomicUsize::new(0),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn insert(&self, site: Site) {
        self.sites.write().await.push(site);
    }

    pub async fn get(&self, id: &str) -> Option<Site> {
        self.sites.read().await.iter().find(|s| s.id == id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.get(id).await.is_some()
    }

    pub async fn is_empty(&self) -> bool {
        self.sites.read().await.is_empty()
    }

    /// Number of `find_by_id` calls so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SiteRepository for MockSiteRepository {
    async fn find_all(&self) -> CoreResult<Vec<Site>> {
        Ok(self.sites.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.get(id).await)
    }

    async fn save(&self, site: &Site) -> CoreResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        let mut sites = self.sites.write().await;
        match sites.iter_mut().find(|s| s.id == site.id) {
            Some(existing) => *existing = site.clone(),
            None => sites.push(site.clone()),
        }
        Ok(())
    }
}

// ===== CountingCacheInvalidator =====

#[derive(Default)]
pub struct CountingCacheInvalidator {
    count: AtomicUsize,
}

impl CountingCacheInvalidator {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheInvalidator for CountingCacheInvalidator {
    async fn invalidate(&self) -> CoreResult<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ===== TestHarness =====

/// Service context wired to mocks, with handles kept for assertions.
pub struct TestHarness {
    pub ctx: Arc<ServiceContext>,
    pub provider: Arc<MockEdgeProvider>,
    pub repository: Arc<MockSiteRepository>,
    pub cache: Arc<CountingCacheInvalidator>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    pub fn with_config(configure: impl FnOnce(&mut ProvisionerConfig)) -> Self {
        let mut config = ProvisionerConfig::new("acc-test").unwrap();
        configure(&mut config);

        let provider = Arc::new(MockEdgeProvider::new());
        let repository = Arc::new(MockSiteRepository::new());
        let cache = Arc::new(CountingCacheInvalidator::default());
        let ctx = Arc::new(ServiceContext::new(
            provider.clone(),
            repository.clone(),
            cache.clone(),
            config,
        ));

        Self {
            ctx,
            provider,
            repository,
            cache,
        }
    }
}

// ===== Factories =====

pub fn create_request(name: &str) -> CreateSiteRequest {
    CreateSiteRequest {
        name: name.to_string(),
        root_target: "1.2.3.4".to_string(),
        sub_target: "1.2.3.4".to_string(),
        pagerule_url: format!("{name}/*"),
        pagerule_full_url: format!("www.{name}/*"),
        forwarding_url: "https://example.net".to_string(),
    }
}

pub fn make_site(id: &str, name: &str) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        account_id: "acc-test".to_string(),
        status: ZoneStatus::Pending,
        name_servers: vec!["ada.ns.cloudflare.com".to_string()],
        created_at: Utc::now(),
    }
}

/// Provider error as the Cloudflare mapper would produce it for `code`.
pub fn provider_error(code: &str) -> ProviderError {
    let provider = "mock".to_string();
    match code {
        "1061" => ProviderError::ZoneAlreadyExists {
            provider,
            zone: "example.com".to_string(),
            raw_message: None,
        },
        "1105" => ProviderError::ZoneCreationThrottled {
            provider,
            zone: "example.com".to_string(),
            raw_message: None,
        },
        "1224" => ProviderError::NameserverCheckThrottled {
            provider,
            zone: "zone-1".to_string(),
            raw_message: None,
        },
        "81044" => ProviderError::RecordNotFound {
            provider,
            record_id: "example.com".to_string(),
            raw_message: None,
        },
        "7003" => ProviderError::ZoneNotFound {
            provider,
            zone: "zone-1".to_string(),
            raw_message: None,
        },
        other => ProviderError::Unknown {
            provider,
            raw_code: Some(other.to_string()),
            raw_message: format!("mock failure {other}"),
        },
    }
}
