//! 站点创建流程

use std::sync::Arc;

use edge_provisioner_provider::{DnsRecordSpec, PageruleSpec, ProviderError};

use crate::services::ServiceContext;
use crate::services::error_aggregator::RunRecorder;
use crate::services::site_locks::zone_key;
use crate::types::{
    CreateSiteRequest, ProvisioningFailure, ProvisioningResult, ProvisioningStep, Site,
    StepOutcome,
};

/// Creates a zone and applies the initial configuration.
///
/// Zone creation is the only fatal step. Once the zone exists every remaining
/// step runs regardless of earlier failures:
///
/// 1. create zone
/// 2. persist the site
/// 3. SSL mode, client IP visibility, Always Use HTTPS (concurrently)
/// 4. reset DNS records, create `@` and `www`
/// 5. reset forwarding rules, create the bare and `www` rules
pub struct CreateSiteWorkflow {
    ctx: Arc<ServiceContext>,
}

impl CreateSiteWorkflow {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, request: &CreateSiteRequest) -> ProvisioningResult {
        let _guard = self.ctx.locks.acquire(&zone_key(&request.name)).await;
        log::info!("Creating site {}", request.name);

        let mut recorder = RunRecorder::default();

        let zone = match self
            .ctx
            .provider
            .create_zone(&request.name, &self.ctx.config.account_id)
            .await
        {
            Ok(zone) => zone,
            Err(e) => {
                if e.is_expected() {
                    log::warn!("Zone creation for {} refused: {e}", request.name);
                } else {
                    log::error!("Zone creation for {} failed: {e}", request.name);
                }
                recorder.push(StepOutcome::failure(ProvisioningStep::CreateZone, &e));
                return ProvisioningResult::failed(
                    classify_zone_error(&request.name, e),
                    recorder.into_steps(),
                );
            }
        };
        recorder.push(StepOutcome::success(ProvisioningStep::CreateZone));

        let site = Site::from_zone(zone, &self.ctx.config.account_id);
        log::info!("Zone {} created with id {}", site.name, site.id);

        let saved = self.ctx.site_repository.save(&site).await;
        if let Err(e) = &saved {
            log::error!("Failed to persist site {}: {e}", site.id);
        }
        recorder.track(ProvisioningStep::PersistSite, &saved);

        self.apply_security(&site.id, &mut recorder).await;
        self.seed_dns_records(&site.id, request, &mut recorder).await;
        self.seed_forwarding_rules(&site.id, request, &mut recorder)
            .await;

        let result = recorder.finish(Some(site));
        if result.is_clean() {
            self.ctx.invalidate_cache().await;
            log::info!("Site {} provisioned", request.name);
        } else {
            log::warn!(
                "Site {} provisioned with {} warning(s)",
                request.name,
                result.errors.len()
            );
        }
        result
    }

    /// The three toggles are independent; outcomes are recorded in declaration order.
    async fn apply_security(&self, zone_id: &str, recorder: &mut RunRecorder) {
        let provider = &self.ctx.provider;
        let security = self.ctx.config.security;

        let (ssl, ip_visibility, https) = futures::join!(
            provider.set_ssl_mode(zone_id, security.ssl_mode),
            provider.set_ip_visibility_mode(zone_id, security.ip_visibility),
            provider.set_https_mode(zone_id, security.https_mode),
        );

        recorder.track(ProvisioningStep::SetSslMode, &ssl);
        recorder.track(ProvisioningStep::SetIpVisibility, &ip_visibility);
        recorder.track(ProvisioningStep::SetHttpsMode, &https);
    }

    async fn seed_dns_records(
        &self,
        zone_id: &str,
        request: &CreateSiteRequest,
        recorder: &mut RunRecorder,
    ) {
        let provider = &self.ctx.provider;

        let reset = provider.reset_dns_records(zone_id).await;
        recorder.track(ProvisioningStep::ResetDnsRecords, &reset);

        let root = provider
            .create_dns_record(&DnsRecordSpec::new(zone_id, "@", &request.root_target))
            .await;
        recorder.track(ProvisioningStep::CreateRootRecord, &root);

        let www = provider
            .create_dns_record(&DnsRecordSpec::new(zone_id, "www", &request.sub_target))
            .await;
        recorder.track(ProvisioningStep::CreateWwwRecord, &www);
    }

    async fn seed_forwarding_rules(
        &self,
        zone_id: &str,
        request: &CreateSiteRequest,
        recorder: &mut RunRecorder,
    ) {
        let provider = &self.ctx.provider;
        let status_code = self.ctx.config.forwarding_status_code;

        let reset = provider.reset_forwarding_rules(zone_id).await;
        recorder.track(ProvisioningStep::ResetForwardingRules, &reset);

        let root = provider
            .create_forwarding_rule(
                &PageruleSpec::new(zone_id, &request.pagerule_url, &request.forwarding_url)
                    .with_status_code(status_code),
            )
            .await;
        recorder.track(ProvisioningStep::CreateRootForwardingRule, &root);

        let www = provider
            .create_forwarding_rule(
                &PageruleSpec::new(
                    zone_id,
                    &request.pagerule_full_url,
                    &request.forwarding_url,
                )
                .with_status_code(status_code),
            )
            .await;
        recorder.track(ProvisioningStep::CreateWwwForwardingRule, &www);
    }
}

fn classify_zone_error(name: &str, err: ProviderError) -> ProvisioningFailure {
    match err {
        ProviderError::ZoneAlreadyExists { .. } => ProvisioningFailure::DuplicateZone {
            name: name.to_string(),
        },
        ProviderError::ZoneCreationThrottled { .. } => ProvisioningFailure::ZoneRateLimited {
            name: name.to_string(),
        },
        other => ProvisioningFailure::ZoneCreation {
            name: name.to_string(),
            detail: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_utils::{MockOp, TestHarness, create_request, provider_error};
    use crate::types::SslMode;

    const ALL_STEPS: [ProvisioningStep; 11] = [
        ProvisioningStep::CreateZone,
        ProvisioningStep::PersistSite,
        ProvisioningStep::SetSslMode,
        ProvisioningStep::SetIpVisibility,
        ProvisioningStep::SetHttpsMode,
        ProvisioningStep::ResetDnsRecords,
        ProvisioningStep::CreateRootRecord,
        ProvisioningStep::CreateWwwRecord,
        ProvisioningStep::ResetForwardingRules,
        ProvisioningStep::CreateRootForwardingRule,
        ProvisioningStep::CreateWwwForwardingRule,
    ];

    fn workflow(harness: &TestHarness) -> CreateSiteWorkflow {
        CreateSiteWorkflow::new(Arc::clone(&harness.ctx))
    }

    #[tokio::test]
    async fn provisions_example_com_end_to_end() {
        let harness = TestHarness::new();

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(result.succeeded_overall);
        assert!(!result.has_warnings);
        assert!(result.errors.is_empty());
        let site = result.site.as_ref().unwrap();
        assert_eq!(site.name, "example.com");
        assert_eq!(site.account_id, "acc-test");

        let steps: Vec<_> = result.steps.iter().map(|s| s.step).collect();
        assert_eq!(steps, ALL_STEPS);
        assert!(result.steps.iter().all(|s| s.succeeded));

        // 持久化 + 缓存失效
        assert!(harness.repository.contains(&site.id).await);
        assert_eq!(harness.cache.count(), 1);
    }

    #[tokio::test]
    async fn seeds_records_and_rules_from_request() {
        let harness = TestHarness::new();

        workflow(&harness).execute(&create_request("example.com")).await;

        let records = harness.provider.created_records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "@");
        assert_eq!(records[0].content, "1.2.3.4");
        assert_eq!(records[1].name, "www");
        assert!(records.iter().all(|r| r.proxied));

        let rules = harness.provider.created_rules().await;
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].url, "example.com/*");
        assert_eq!(rules[1].url, "www.example.com/*");
        assert!(
            rules
                .iter()
                .all(|r| r.forwarding_url == "https://example.net" && r.status_code == 301)
        );
    }

    #[tokio::test]
    async fn resets_happen_before_seeding() {
        let harness = TestHarness::new();

        workflow(&harness).execute(&create_request("example.com")).await;

        let calls = harness.provider.calls().await;
        let position = |op: MockOp| calls.iter().position(|c| *c == op).unwrap();
        assert_eq!(calls[0], MockOp::CreateZone);
        assert!(position(MockOp::ResetDnsRecords) < position(MockOp::CreateDnsRecord));
        assert!(position(MockOp::CreateDnsRecord) < position(MockOp::ResetForwardingRules));
        assert!(
            position(MockOp::ResetForwardingRules) < position(MockOp::CreateForwardingRule)
        );
    }

    #[tokio::test]
    async fn duplicate_zone_halts_after_creation_attempt() {
        let harness = TestHarness::new();
        harness
            .provider
            .fail_on(MockOp::CreateZone, provider_error("1061"))
            .await;

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(!result.succeeded_overall);
        assert!(!result.has_warnings);
        assert_eq!(
            result.failure,
            Some(ProvisioningFailure::DuplicateZone {
                name: "example.com".to_string()
            })
        );
        assert_eq!(result.errors.len(), 1);
        assert!(result.site.is_none());
        assert_eq!(harness.provider.calls().await, vec![MockOp::CreateZone]);
        assert!(harness.repository.is_empty().await);
        assert_eq!(harness.cache.count(), 0);
    }

    #[tokio::test]
    async fn creation_throttle_reports_wait_time() {
        let harness = TestHarness::new();
        harness
            .provider
            .fail_on(MockOp::CreateZone, provider_error("1105"))
            .await;

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(!result.succeeded_overall);
        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::ZoneRateLimited { .. })
        ));
        assert!(result.errors[0].contains("3 hours"));
        assert_eq!(harness.provider.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn other_creation_errors_are_generic() {
        let harness = TestHarness::new();
        harness
            .provider
            .fail_on(MockOp::CreateZone, provider_error("1000"))
            .await;

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::ZoneCreation { .. })
        ));
        assert_eq!(result.steps.len(), 1);
        assert!(!result.steps[0].succeeded);
    }

    #[tokio::test]
    async fn single_soft_failure_does_not_stop_the_run() {
        let harness = TestHarness::new();
        harness
            .provider
            .fail_on(MockOp::SetSslMode, provider_error("1000"))
            .await;

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(result.succeeded_overall);
        assert!(result.has_warnings);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Failed to set the SSL mode"));
        assert_eq!(result.steps.len(), ALL_STEPS.len());
        assert_eq!(harness.provider.created_rules().await.len(), 2);
        assert_eq!(harness.cache.count(), 0);
    }

    #[tokio::test]
    async fn soft_failures_are_reported_in_step_order() {
        let harness = TestHarness::new();
        for op in [
            MockOp::CreateForwardingRule,
            MockOp::SetHttpsMode,
            MockOp::SetIpVisibility,
            MockOp::ResetDnsRecords,
        ] {
            harness.provider.fail_on(op, provider_error("1000")).await;
        }

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        let prefixes: Vec<_> = result
            .errors
            .iter()
            .map(|e| e.split(':').next().unwrap_or_default())
            .collect();
        assert_eq!(
            prefixes,
            vec![
                "Failed to set client IP visibility",
                "Failed to enable Always Use HTTPS",
                "Failed to remove existing DNS records",
                "Failed to create the root forwarding rule",
                "Failed to create the www forwarding rule",
            ]
        );
    }

    #[tokio::test]
    async fn persistence_failure_is_a_warning() {
        let harness = TestHarness::new();
        harness
            .repository
            .set_save_error(Some("disk full".to_string()))
            .await;

        let result = workflow(&harness).execute(&create_request("example.com")).await;

        assert!(result.succeeded_overall);
        assert!(result.has_warnings);
        assert!(result.site.is_some());
        assert!(!result.step(ProvisioningStep::PersistSite).unwrap().succeeded);
        assert!(result.step(ProvisioningStep::CreateWwwForwardingRule).unwrap().succeeded);
    }

    #[tokio::test]
    async fn applies_configured_security_profile() {
        let harness = TestHarness::with_config(|config| {
            config.security.ssl_mode = SslMode::Full;
        });

        workflow(&harness).execute(&create_request("example.com")).await;

        assert_eq!(harness.provider.ssl_modes().await, vec![SslMode::Full]);
    }
}
