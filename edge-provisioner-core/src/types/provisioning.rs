//! 预配流程结果类型

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Site;

/// A single provider-facing step of a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningStep {
    CreateZone,
    PersistSite,
    SetSslMode,
    SetIpVisibility,
    SetHttpsMode,
    ResetDnsRecords,
    CreateRootRecord,
    CreateWwwRecord,
    ResetForwardingRules,
    CreateRootForwardingRule,
    CreateWwwForwardingRule,
    UpdateRootRecord,
    UpdateWwwRecord,
    UpdateForwardingRules,
    CheckNameservers,
}

impl ProvisioningStep {
    /// Stable `snake_case` name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateZone => "create_zone",
            Self::PersistSite => "persist_site",
            Self::SetSslMode => "set_ssl_mode",
            Self::SetIpVisibility => "set_ip_visibility",
            Self::SetHttpsMode => "set_https_mode",
            Self::ResetDnsRecords => "reset_dns_records",
            Self::CreateRootRecord => "create_root_record",
            Self::CreateWwwRecord => "create_www_record",
            Self::ResetForwardingRules => "reset_forwarding_rules",
            Self::CreateRootForwardingRule => "create_root_forwarding_rule",
            Self::CreateWwwForwardingRule => "create_www_forwarding_rule",
            Self::UpdateRootRecord => "update_root_record",
            Self::UpdateWwwRecord => "update_www_record",
            Self::UpdateForwardingRules => "update_forwarding_rules",
            Self::CheckNameservers => "check_nameservers",
        }
    }

    /// Operator-facing message recorded when the step fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreateZone => "Failed to create the zone",
            Self::PersistSite => "The zone was created but could not be saved locally",
            Self::SetSslMode => "Failed to set the SSL mode",
            Self::SetIpVisibility => "Failed to set client IP visibility",
            Self::SetHttpsMode => "Failed to enable Always Use HTTPS",
            Self::ResetDnsRecords => "Failed to remove existing DNS records",
            Self::CreateRootRecord => "Failed to create the root DNS record",
            Self::CreateWwwRecord => "Failed to create the www DNS record",
            Self::ResetForwardingRules => "Failed to remove existing forwarding rules",
            Self::CreateRootForwardingRule => "Failed to create the root forwarding rule",
            Self::CreateWwwForwardingRule => "Failed to create the www forwarding rule",
            Self::UpdateRootRecord => "Failed to update the root DNS record",
            Self::UpdateWwwRecord => "Failed to update the www DNS record",
            Self::UpdateForwardingRules => "Failed to update the forwarding rules",
            Self::CheckNameservers => "Nameserver check failed",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one attempted step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub step: ProvisioningStep,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl StepOutcome {
    pub fn success(step: ProvisioningStep) -> Self {
        Self {
            step,
            succeeded: true,
            error_description: None,
        }
    }

    /// Failed step; the description is the step's fixed message followed by `detail`.
    pub fn failure(step: ProvisioningStep, detail: impl fmt::Display) -> Self {
        Self {
            step,
            succeeded: false,
            error_description: Some(format!("{}: {detail}", step.failure_message())),
        }
    }

    /// Build from a step's result.
    pub fn from_result<T, E: fmt::Display>(step: ProvisioningStep, result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::success(step),
            Err(e) => Self::failure(step, e),
        }
    }
}

/// Why a workflow stopped without completing.
///
/// The `Display` text is the single error message reported in the result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProvisioningFailure {
    /// Caller input rejected before any provider call.
    #[error("{message}")]
    Validation { message: String },

    /// The site is not known to the repository.
    #[error("Zone {site_id} not found")]
    NotFound { site_id: String },

    /// A zone with this name already exists under the account.
    #[error("The domain {name} already exists in the account")]
    DuplicateZone { name: String },

    /// The zone was added too many times recently.
    #[error(
        "The domain {name} has been added too many times recently; wait about 3 hours before trying again"
    )]
    ZoneRateLimited { name: String },

    /// Any other zone creation failure.
    #[error("Failed to create the zone {name}: {detail}")]
    ZoneCreation { name: String, detail: String },

    /// Nameserver check requested more than once within the hour.
    #[error("The nameserver check for zone {site_id} can only be run once per hour")]
    NameserverCheckThrottled { site_id: String },

    /// Any other nameserver check failure.
    #[error("Nameserver check failed for zone {site_id}: {detail}")]
    NameserverCheck { site_id: String, detail: String },
}

/// Aggregate outcome of one workflow run.
///
/// `succeeded_overall` only reflects the fatal step and preconditions; soft
/// step failures show up as `has_warnings` plus their messages in `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResult {
    pub succeeded_overall: bool,
    pub has_warnings: bool,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<Site>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ProvisioningFailure>,
    /// Steps attempted, in order.
    #[serde(default)]
    pub steps: Vec<StepOutcome>,
}

impl ProvisioningResult {
    /// Halted run: exactly one error, no warnings, no site.
    pub fn failed(failure: ProvisioningFailure, steps: Vec<StepOutcome>) -> Self {
        Self {
            succeeded_overall: false,
            has_warnings: false,
            errors: vec![failure.to_string()],
            site: None,
            failure: Some(failure),
            steps,
        }
    }

    /// Completed run; every entry of `errors` is a soft failure.
    pub fn completed(site: Option<Site>, errors: Vec<String>, steps: Vec<StepOutcome>) -> Self {
        Self {
            succeeded_overall: true,
            has_warnings: !errors.is_empty(),
            errors,
            site,
            failure: None,
            steps,
        }
    }

    /// Completed without a single warning.
    pub fn is_clean(&self) -> bool {
        self.succeeded_overall && !self.has_warnings
    }

    /// Outcome recorded for `step`, if it was attempted.
    pub fn step(&self, step: ProvisioningStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|outcome| outcome.step == step)
    }
}
