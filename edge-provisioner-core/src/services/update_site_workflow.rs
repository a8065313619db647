//! 站点更新流程

use std::sync::Arc;

use edge_provisioner_provider::DnsRecordSpec;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::services::error_aggregator::RunRecorder;
use crate::services::site_locks::zone_key;
use crate::types::{ProvisioningFailure, ProvisioningResult, ProvisioningStep, UpdateSiteRequest};

/// Re-points an existing site's DNS records and, optionally, its forwarding rules.
pub struct UpdateSiteWorkflow {
    ctx: Arc<ServiceContext>,
}

impl UpdateSiteWorkflow {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// Run the update.
    ///
    /// A declared but empty forwarding URL is rejected before anything else is
    /// touched; an unknown site is rejected before any provider call. All three
    /// update steps are soft. Only repository read failures surface as `Err`.
    pub async fn execute(&self, request: &UpdateSiteRequest) -> CoreResult<ProvisioningResult> {
        let forwarding_url = match validate_forwarding_url(request) {
            Ok(url) => url,
            Err(failure) => {
                log::warn!("Rejected update of {}: {failure}", request.site_id);
                return Ok(ProvisioningResult::failed(failure, Vec::new()));
            }
        };

        let Some(site) = self.ctx.site_repository.find_by_id(&request.site_id).await? else {
            log::warn!("Update requested for unknown site {}", request.site_id);
            return Ok(ProvisioningResult::failed(
                ProvisioningFailure::NotFound {
                    site_id: request.site_id.clone(),
                },
                Vec::new(),
            ));
        };
        let _guard = self.ctx.locks.acquire(&zone_key(&site.name)).await;
        log::info!("Updating site {} ({})", site.name, site.id);

        let provider = &self.ctx.provider;
        let mut recorder = RunRecorder::default();

        let root = provider
            .update_dns_record(&DnsRecordSpec::new(
                &site.id,
                &site.name,
                &request.root_target,
            ))
            .await;
        recorder.track(ProvisioningStep::UpdateRootRecord, &root);

        let www = provider
            .update_dns_record(&DnsRecordSpec::new(
                &site.id,
                site.www_name(),
                &request.sub_target,
            ))
            .await;
        recorder.track(ProvisioningStep::UpdateWwwRecord, &www);

        if let Some(url) = forwarding_url {
            let rules = provider.update_forwarding_rules(&site.id, url).await;
            recorder.track(ProvisioningStep::UpdateForwardingRules, &rules);
        }

        let result = recorder.finish(Some(site));
        if result.is_clean() {
            self.ctx.invalidate_cache().await;
            log::info!("Site {} updated", request.site_id);
        } else {
            log::warn!(
                "Site {} updated with {} warning(s)",
                request.site_id,
                result.errors.len()
            );
        }
        Ok(result)
    }
}

/// The forwarding URL to apply, if the caller declared one.
fn validate_forwarding_url(request: &UpdateSiteRequest) -> Result<Option<&str>, ProvisioningFailure> {
    if !request.forwarding_url_was_provided {
        return Ok(None);
    }
    match request.forwarding_url.as_deref().map(str::trim) {
        Some(url) if !url.is_empty() => Ok(Some(url)),
        _ => Err(ProvisioningFailure::Validation {
            message: "A forwarding URL is required when updating forwarding rules".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockOp, TestHarness, make_site, provider_error};

    async fn harness_with_site() -> TestHarness {
        let harness = TestHarness::new();
        harness
            .repository
            .insert(make_site("zone-1", "example.com"))
            .await;
        harness
    }

    fn workflow(harness: &TestHarness) -> UpdateSiteWorkflow {
        UpdateSiteWorkflow::new(Arc::clone(&harness.ctx))
    }

    #[tokio::test]
    async fn waits_for_a_running_create_of_the_same_zone() {
        let harness = harness_with_site().await;
        let creating = harness.ctx.locks.acquire("example.com").await;

        let update = {
            let workflow = workflow(&harness);
            tokio::spawn(async move {
                let request = UpdateSiteRequest::new("zone-1", "5.6.7.8", "5.6.7.8");
                workflow.execute(&request).await.unwrap()
            })
        };

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!update.is_finished());
        assert!(harness.provider.calls().await.is_empty());

        drop(creating);
        let result = update.await.unwrap();
        assert!(result.is_clean());
    }

    #[tokio::test]
    async fn empty_declared_forwarding_url_is_rejected_without_calls() {
        let harness = harness_with_site().await;
        let mut request = UpdateSiteRequest::new("zone-1", "1.2.3.4", "1.2.3.4");
        request.forwarding_url_was_provided = true;
        request.forwarding_url = Some("  ".to_string());

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(!result.succeeded_overall);
        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::Validation { .. })
        ));
        assert_eq!(result.errors.len(), 1);
        assert!(harness.provider.calls().await.is_empty());
        assert_eq!(harness.repository.read_count(), 0);
    }

    #[tokio::test]
    async fn missing_forwarding_url_is_rejected_too() {
        let harness = harness_with_site().await;
        let mut request = UpdateSiteRequest::new("zone-1", "1.2.3.4", "1.2.3.4");
        request.forwarding_url_was_provided = true;

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::Validation { .. })
        ));
        assert!(harness.provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_site_makes_no_provider_calls() {
        let harness = TestHarness::new();
        let request = UpdateSiteRequest::new("missing", "1.2.3.4", "1.2.3.4");

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(!result.succeeded_overall);
        assert_eq!(
            result.failure,
            Some(ProvisioningFailure::NotFound {
                site_id: "missing".to_string()
            })
        );
        assert_eq!(result.errors, vec!["Zone missing not found".to_string()]);
        assert!(harness.provider.calls().await.is_empty());
    }

    #[tokio::test]
    async fn updates_records_by_full_name() {
        let harness = harness_with_site().await;
        let request = UpdateSiteRequest::new("zone-1", "5.6.7.8", "origin.example.net");

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(result.is_clean());
        let updated = harness.provider.updated_records().await;
        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].name, "example.com");
        assert_eq!(updated[0].content, "5.6.7.8");
        assert_eq!(updated[1].name, "www.example.com");
        assert_eq!(updated[1].content, "origin.example.net");
        // 未声明转发目标时不触碰转发规则
        assert!(harness.provider.forwarding_updates().await.is_empty());
        assert_eq!(harness.cache.count(), 1);
    }

    #[tokio::test]
    async fn updates_forwarding_rules_when_provided() {
        let harness = harness_with_site().await;
        let request = UpdateSiteRequest::new("zone-1", "5.6.7.8", "5.6.7.8")
            .with_forwarding_url("https://new.example.net");

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(result.is_clean());
        assert_eq!(result.steps.len(), 3);
        assert_eq!(
            harness.provider.forwarding_updates().await,
            vec![("zone-1".to_string(), "https://new.example.net".to_string())]
        );
    }

    #[tokio::test]
    async fn each_failed_step_has_its_own_message() {
        let harness = harness_with_site().await;
        harness
            .provider
            .fail_on(MockOp::UpdateDnsRecord, provider_error("81044"))
            .await;
        harness
            .provider
            .fail_on(MockOp::UpdateForwardingRules, provider_error("1000"))
            .await;
        let request = UpdateSiteRequest::new("zone-1", "5.6.7.8", "5.6.7.8")
            .with_forwarding_url("https://new.example.net");

        let result = workflow(&harness).execute(&request).await.unwrap();

        assert!(result.succeeded_overall);
        assert!(result.has_warnings);
        assert_eq!(result.errors.len(), 3);
        assert!(result.errors[0].starts_with("Failed to update the root DNS record"));
        assert!(result.errors[1].starts_with("Failed to update the www DNS record"));
        assert!(result.errors[2].starts_with("Failed to update the forwarding rules"));
        assert_eq!(harness.cache.count(), 0);
    }
}
