//! Cloudflare `EdgeProvider` trait 实现

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{ProviderError, Result};
use crate::providers::common::{normalize_domain_name, qualify_record_name};
use crate::traits::{EdgeProvider, ErrorContext, ProviderErrorMapper};
use crate::types::{
    DnsRecord, DnsRecordSpec, DnsRecordType, ForwardingRule, HttpsMode, IpVisibilityMode,
    PageruleSpec, PaginatedResponse, PaginationParams, ProviderZone, SslMode, ZoneStatus,
};

use super::types::{
    CloudflareAccountRef, CloudflareDnsRecordBody, ForwardingUrlValue, PageRuleAction,
    PageRuleConstraint, PageRuleTarget,
};
use super::{
    CloudflareDnsRecord, CloudflarePageRule, CloudflareProvider, CloudflareSetting,
    CloudflareZone, MAX_PAGE_SIZE_RECORDS, MAX_PAGE_SIZE_ZONES,
};

/// Page rule action id for URL forwarding
const FORWARDING_ACTION: &str = "forwarding_url";

/// DNS 记录 TTL，1 = automatic
const AUTO_TTL: u32 = 1;

impl CloudflareProvider {
    /// 将 Cloudflare zone 转换为 `ProviderZone`
    pub(crate) fn zone_to_provider_zone(zone: CloudflareZone) -> ProviderZone {
        ProviderZone {
            status: ZoneStatus::from_provider_str(&zone.status),
            id: zone.id,
            name: zone.name,
            account_id: zone.account.map(|account| account.id),
            name_servers: zone.name_servers,
        }
    }

    pub(crate) fn cf_record_to_dns_record(record: CloudflareDnsRecord, zone_id: &str) -> DnsRecord {
        DnsRecord {
            id: record.id,
            site_id: zone_id.to_string(),
            record_type: record.record_type,
            name: record.name,
            content: record.content,
            proxied: record.proxied,
        }
    }

    /// 构造 forwarding page rule 请求体
    pub(crate) fn page_rule_body(spec: &PageruleSpec) -> CloudflarePageRule {
        let forwarding = ForwardingUrlValue {
            url: spec.forwarding_url.clone(),
            status_code: spec.status_code,
        };
        CloudflarePageRule {
            id: String::new(),
            targets: vec![PageRuleTarget {
                target: "url".to_string(),
                constraint: PageRuleConstraint {
                    operator: "matches".to_string(),
                    value: spec.url.clone(),
                },
            }],
            actions: vec![PageRuleAction {
                id: FORWARDING_ACTION.to_string(),
                value: serde_json::to_value(forwarding).ok(),
            }],
            status: "active".to_string(),
        }
    }

    /// 将 Cloudflare page rule 转换为 `ForwardingRule`
    ///
    /// 非转发规则的 `forwarding_url` / `status_code` 为 `None`。
    pub(crate) fn page_rule_to_forwarding_rule(
        rule: CloudflarePageRule,
        zone_id: &str,
    ) -> ForwardingRule {
        let url = rule
            .targets
            .into_iter()
            .next()
            .map(|target| target.constraint.value)
            .unwrap_or_default();
        let forwarding = rule
            .actions
            .into_iter()
            .find(|action| action.id == FORWARDING_ACTION)
            .and_then(|action| action.value)
            .and_then(|value| serde_json::from_value::<ForwardingUrlValue>(value).ok());

        ForwardingRule {
            id: rule.id,
            site_id: zone_id.to_string(),
            url,
            forwarding_url: forwarding.as_ref().map(|f| f.url.clone()),
            status_code: forwarding.map(|f| f.status_code),
        }
    }

    async fn zone_name(&self, zone_id: &str) -> Result<String> {
        let zone: CloudflareZone = self
            .get(&format!("/zones/{zone_id}"), ErrorContext::zone(zone_id))
            .await?;
        Ok(zone.name)
    }

    async fn patch_setting(&self, zone_id: &str, setting: &str, value: &str) -> Result<()> {
        let body = json!({ "value": value });
        let applied: CloudflareSetting = self
            .call(
                Method::PATCH,
                &format!("/zones/{zone_id}/settings/{setting}"),
                Some(&body),
                ErrorContext::zone(zone_id),
            )
            .await?;
        log::debug!("[{}] {zone_id}: {} = {}", self.provider_name(), applied.id, applied.value);
        Ok(())
    }
}

#[async_trait]
impl EdgeProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        #[derive(Deserialize)]
        struct VerifyResponse {
            status: String,
        }

        match self
            .get::<VerifyResponse>("/user/tokens/verify", ErrorContext::default())
            .await
        {
            Ok(resp) => Ok(resp.status == "active"),
            Err(ProviderError::InvalidCredentials { .. } | ProviderError::PermissionDenied { .. }) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn create_zone(&self, name: &str, account_id: &str) -> Result<ProviderZone> {
        #[derive(Serialize)]
        struct CreateZoneBody<'a> {
            name: String,
            account: CloudflareAccountRef,
            #[serde(rename = "type")]
            zone_type: &'a str,
        }

        let name = normalize_domain_name(name);
        let body = CreateZoneBody {
            name: name.clone(),
            account: CloudflareAccountRef {
                id: account_id.to_string(),
            },
            zone_type: "full",
        };

        let zone: CloudflareZone = self
            .call(Method::POST, "/zones", Some(&body), ErrorContext::zone(name))
            .await?;
        Ok(Self::zone_to_provider_zone(zone))
    }

    async fn get_zone(&self, zone_id: &str) -> Result<ProviderZone> {
        let zone: CloudflareZone = self
            .get(&format!("/zones/{zone_id}"), ErrorContext::zone(zone_id))
            .await?;
        Ok(Self::zone_to_provider_zone(zone))
    }

    async fn list_zones(
        &self,
        params: &PaginationParams,
    ) -> Result<PaginatedResponse<ProviderZone>> {
        let params = params.validated(MAX_PAGE_SIZE_ZONES);
        let (zones, total_count, _) = self
            .get_page::<CloudflareZone>(
                "/zones",
                params.page,
                params.page_size,
                ErrorContext::default(),
            )
            .await?;
        let zones = zones.into_iter().map(Self::zone_to_provider_zone).collect();
        Ok(PaginatedResponse::new(
            zones,
            params.page,
            params.page_size,
            total_count,
        ))
    }

    async fn set_ssl_mode(&self, zone_id: &str, mode: SslMode) -> Result<()> {
        self.patch_setting(zone_id, "ssl", mode.as_str()).await
    }

    async fn set_ip_visibility_mode(&self, zone_id: &str, mode: IpVisibilityMode) -> Result<()> {
        self.patch_setting(zone_id, "pseudo_ipv4", mode.as_str())
            .await
    }

    async fn set_https_mode(&self, zone_id: &str, mode: HttpsMode) -> Result<()> {
        self.patch_setting(zone_id, "always_use_https", mode.as_str())
            .await
    }

    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        let records: Vec<CloudflareDnsRecord> = self
            .get_all_pages(
                &format!("/zones/{zone_id}/dns_records"),
                MAX_PAGE_SIZE_RECORDS,
                &ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(records
            .into_iter()
            .map(|r| Self::cf_record_to_dns_record(r, zone_id))
            .collect())
    }

    async fn delete_dns_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let context = ErrorContext {
            record_id: Some(record_id.to_string()),
            ..ErrorContext::zone(zone_id)
        };
        self.call_unit::<()>(
            Method::DELETE,
            &format!("/zones/{zone_id}/dns_records/{record_id}"),
            None,
            context,
        )
        .await
    }

    async fn create_dns_record(&self, spec: &DnsRecordSpec) -> Result<DnsRecord> {
        let zone_name = self.zone_name(&spec.site_id).await?;
        let full_name = qualify_record_name(&spec.name, &zone_name);

        let body = CloudflareDnsRecordBody {
            record_type: spec.record_type.as_str(),
            name: full_name.clone(),
            content: &spec.content,
            ttl: AUTO_TTL,
            proxied: spec.proxied,
        };

        let record: CloudflareDnsRecord = self
            .call(
                Method::POST,
                &format!("/zones/{}/dns_records", spec.site_id),
                Some(&body),
                ErrorContext::record(&spec.site_id, full_name),
            )
            .await?;
        Ok(Self::cf_record_to_dns_record(record, &spec.site_id))
    }

    async fn update_dns_record(&self, spec: &DnsRecordSpec) -> Result<DnsRecord> {
        let zone_name = self.zone_name(&spec.site_id).await?;
        let full_name = qualify_record_name(&spec.name, &zone_name);
        let context = ErrorContext::record(&spec.site_id, full_name.clone());

        let candidates: Vec<CloudflareDnsRecord> = self
            .get_all_pages(
                &format!(
                    "/zones/{}/dns_records?name={}",
                    spec.site_id,
                    urlencoding::encode(&full_name)
                ),
                MAX_PAGE_SIZE_RECORDS,
                &context,
            )
            .await?;

        let existing = candidates
            .into_iter()
            .find(|r| {
                [DnsRecordType::A, DnsRecordType::Aaaa, DnsRecordType::Cname]
                    .iter()
                    .any(|t| t.as_str() == r.record_type)
            })
            .ok_or_else(|| ProviderError::RecordNotFound {
                provider: self.provider_name().to_string(),
                record_id: full_name.clone(),
                raw_message: None,
            })?;

        let body = CloudflareDnsRecordBody {
            record_type: spec.record_type.as_str(),
            name: full_name,
            content: &spec.content,
            ttl: AUTO_TTL,
            proxied: spec.proxied,
        };

        let record: CloudflareDnsRecord = self
            .call(
                Method::PATCH,
                &format!("/zones/{}/dns_records/{}", spec.site_id, existing.id),
                Some(&body),
                ErrorContext {
                    record_id: Some(existing.id.clone()),
                    ..context
                },
            )
            .await?;
        Ok(Self::cf_record_to_dns_record(record, &spec.site_id))
    }

    async fn list_forwarding_rules(&self, zone_id: &str) -> Result<Vec<ForwardingRule>> {
        let rules: Vec<CloudflarePageRule> = self
            .get(
                &format!("/zones/{zone_id}/pagerules"),
                ErrorContext::zone(zone_id),
            )
            .await?;
        Ok(rules
            .into_iter()
            .map(|rule| Self::page_rule_to_forwarding_rule(rule, zone_id))
            .collect())
    }

    async fn delete_forwarding_rule(&self, zone_id: &str, rule_id: &str) -> Result<()> {
        let context = ErrorContext {
            record_id: Some(rule_id.to_string()),
            ..ErrorContext::zone(zone_id)
        };
        self.call_unit::<()>(
            Method::DELETE,
            &format!("/zones/{zone_id}/pagerules/{rule_id}"),
            None,
            context,
        )
        .await
    }

    async fn create_forwarding_rule(&self, spec: &PageruleSpec) -> Result<ForwardingRule> {
        let body = Self::page_rule_body(spec);
        let rule: CloudflarePageRule = self
            .call(
                Method::POST,
                &format!("/zones/{}/pagerules", spec.site_id),
                Some(&body),
                ErrorContext::record(&spec.site_id, &spec.url),
            )
            .await?;
        Ok(Self::page_rule_to_forwarding_rule(rule, &spec.site_id))
    }

    async fn update_forwarding_rule(
        &self,
        rule_id: &str,
        spec: &PageruleSpec,
    ) -> Result<ForwardingRule> {
        let body = Self::page_rule_body(spec);
        let context = ErrorContext {
            record_id: Some(rule_id.to_string()),
            ..ErrorContext::record(&spec.site_id, &spec.url)
        };
        let rule: CloudflarePageRule = self
            .call(
                Method::PUT,
                &format!("/zones/{}/pagerules/{rule_id}", spec.site_id),
                Some(&body),
                context,
            )
            .await?;
        Ok(Self::page_rule_to_forwarding_rule(rule, &spec.site_id))
    }

    async fn check_nameservers(&self, zone_id: &str) -> Result<()> {
        self.call_unit::<()>(
            Method::PUT,
            &format!("/zones/{zone_id}/activation_check"),
            None,
            ErrorContext::zone(zone_id),
        )
        .await
    }
}
