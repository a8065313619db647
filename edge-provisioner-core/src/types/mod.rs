//! 类型定义模块

mod provisioning;
mod site;

pub use provisioning::{ProvisioningFailure, ProvisioningResult, ProvisioningStep, StepOutcome};
pub use site::{CreateSiteRequest, Site, UpdateSiteRequest};

// Re-export provider 库的公共类型
pub use edge_provisioner_provider::{
    DnsRecord, DnsRecordSpec, DnsRecordType, ForwardingRule, HttpsMode, IpVisibilityMode,
    PageruleSpec, PaginatedResponse, PaginationParams, ProviderZone, SslMode, ZoneStatus,
};
