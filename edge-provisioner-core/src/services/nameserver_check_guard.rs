//! Nameserver 检查

use std::sync::Arc;

use edge_provisioner_provider::ProviderError;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::services::site_locks::zone_key;
use crate::types::{ProvisioningFailure, ProvisioningResult, ProvisioningStep, StepOutcome};

/// Asks the provider to re-verify a site's nameserver delegation.
///
/// Cloudflare accepts one check per zone per hour; a throttled request is
/// reported as its own failure kind. Nothing is persisted.
pub struct NameserverCheckGuard {
    ctx: Arc<ServiceContext>,
}

impl NameserverCheckGuard {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    pub async fn check(&self, site_id: &str) -> CoreResult<ProvisioningResult> {
        let Some(site) = self.ctx.site_repository.find_by_id(site_id).await? else {
            log::warn!("Nameserver check requested for unknown site {site_id}");
            return Ok(ProvisioningResult::failed(
                ProvisioningFailure::NotFound {
                    site_id: site_id.to_string(),
                },
                Vec::new(),
            ));
        };
        let _guard = self.ctx.locks.acquire(&zone_key(&site.name)).await;

        match self.ctx.provider.check_nameservers(&site.id).await {
            Ok(()) => {
                log::info!("Nameserver check requested for {}", site.name);
                Ok(ProvisioningResult::completed(
                    Some(site),
                    Vec::new(),
                    vec![StepOutcome::success(ProvisioningStep::CheckNameservers)],
                ))
            }
            Err(e) => {
                let steps = vec![StepOutcome::failure(ProvisioningStep::CheckNameservers, &e)];
                let failure = match e {
                    ProviderError::NameserverCheckThrottled { .. } => {
                        log::warn!("Nameserver check for {site_id} throttled");
                        ProvisioningFailure::NameserverCheckThrottled {
                            site_id: site_id.to_string(),
                        }
                    }
                    other => {
                        log::error!("Nameserver check for {site_id} failed: {other}");
                        ProvisioningFailure::NameserverCheck {
                            site_id: site_id.to_string(),
                            detail: other.to_string(),
                        }
                    }
                };
                Ok(ProvisioningResult::failed(failure, steps))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockOp, TestHarness, make_site, provider_error};

    async fn guard() -> (NameserverCheckGuard, TestHarness) {
        let harness = TestHarness::new();
        harness
            .repository
            .insert(make_site("zone-1", "example.com"))
            .await;
        (NameserverCheckGuard::new(Arc::clone(&harness.ctx)), harness)
    }

    #[tokio::test]
    async fn successful_check() {
        let (guard, harness) = guard().await;

        let result = guard.check("zone-1").await.unwrap();

        assert!(result.is_clean());
        assert_eq!(
            harness.provider.calls().await,
            vec![MockOp::CheckNameservers]
        );
    }

    #[tokio::test]
    async fn waits_for_other_runs_on_the_zone() {
        let (guard, harness) = guard().await;
        let running = harness.ctx.locks.acquire("example.com").await;

        let check = tokio::spawn(async move { guard.check("zone-1").await.unwrap() });

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!check.is_finished());

        drop(running);
        assert!(check.await.unwrap().is_clean());
        assert_eq!(
            harness.provider.calls().await,
            vec![MockOp::CheckNameservers]
        );
    }

    #[tokio::test]
    async fn throttled_check_is_idempotent() {
        let (guard, harness) = guard().await;
        let before = harness.repository.get("zone-1").await;
        harness
            .provider
            .fail_on(MockOp::CheckNameservers, provider_error("1224"))
            .await;

        let first = guard.check("zone-1").await.unwrap();
        let second = guard.check("zone-1").await.unwrap();

        for result in [&first, &second] {
            assert!(!result.succeeded_overall);
            assert!(!result.has_warnings);
            assert_eq!(
                result.failure,
                Some(ProvisioningFailure::NameserverCheckThrottled {
                    site_id: "zone-1".to_string()
                })
            );
            assert!(result.errors[0].contains("once per hour"));
        }
        assert_eq!(first.errors, second.errors);
        // 站点记录不受影响
        assert_eq!(harness.repository.get("zone-1").await, before);
    }

    #[tokio::test]
    async fn other_errors_are_generic_failures() {
        let (guard, harness) = guard().await;
        harness
            .provider
            .fail_on(MockOp::CheckNameservers, provider_error("1000"))
            .await;

        let result = guard.check("zone-1").await.unwrap();

        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::NameserverCheck { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_site_is_not_checked() {
        let (guard, harness) = guard().await;

        let result = guard.check("zone-2").await.unwrap();

        assert!(matches!(
            result.failure,
            Some(ProvisioningFailure::NotFound { .. })
        ));
        assert!(harness.provider.calls().await.is_empty());
    }
}
