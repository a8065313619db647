//! Edge Provisioner Core Library
//!
//! Site provisioning and reconfiguration against an edge provider:
//! - Site creation (zone + security settings + DNS + forwarding rules)
//! - Site update (DNS targets, forwarding destination)
//! - Nameserver verification
//!
//! Workflows never halt on a failed configuration step. Each run collects the
//! failures in an [`ErrorAggregator`](services::ErrorAggregator) and returns a
//! single [`ProvisioningResult`](types::ProvisioningResult).
//!
//! Storage and cache invalidation are abstracted through traits so the
//! application layer can plug in its own adapters.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{ProvisionerConfig, SecurityProfile};
pub use error::{CoreError, CoreResult};
pub use services::{
    CreateSiteWorkflow, ErrorAggregator, NameserverCheckGuard, ServiceContext, SiteLocks,
    SiteService, UpdateSiteWorkflow,
};
pub use traits::{CacheInvalidator, SiteRepository};
