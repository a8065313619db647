use std::net::IpAddr;

use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// Pagination parameters for list operations.
///
/// Pages are 1-indexed. The default is `page = 1, page_size = 20`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}

impl PaginationParams {
    /// Clamp pagination values to valid ranges.
    ///
    /// - `page` is clamped to `>= 1`
    /// - `page_size` is clamped to `1..=max_page_size`
    #[must_use]
    pub fn validated(&self, max_page_size: u32) -> Self {
        Self {
            page: self.page.max(1),
            page_size: self.page_size.clamp(1, max_page_size),
        }
    }
}

/// A paginated response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub items: Vec<T>,
    /// Current page number.
    pub page: u32,
    /// Page size used for this request.
    pub page_size: u32,
    /// Total number of items across all pages.
    pub total_count: u32,
    /// Whether there are more pages after this one.
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Create a new paginated response, automatically computing [`has_more`](Self::has_more).
    pub fn new(items: Vec<T>, page: u32, page_size: u32, total_count: u32) -> Self {
        let has_more = page.saturating_mul(page_size) < total_count;
        Self {
            items,
            page,
            page_size,
            total_count,
            has_more,
        }
    }
}

// ============ Provider Types ============

/// Identifies which provider implementation to use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// Cloudflare. Requires feature `cloudflare`.
    #[cfg(feature = "cloudflare")]
    Cloudflare,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare => write!(f, "cloudflare"),
        }
    }
}

/// Credentials for a provider account.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    /// Cloudflare API token (needs Zone:Edit, DNS:Edit, Page Rules:Edit).
    #[cfg(feature = "cloudflare")]
    #[serde(rename = "cloudflare")]
    Cloudflare {
        /// Cloudflare API token.
        api_token: String,
    },
}

impl ProviderCredentials {
    /// Provider type these credentials belong to.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { .. } => ProviderType::Cloudflare,
        }
    }
}

// Tokens never reach logs through `{:?}`.
impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "cloudflare")]
            Self::Cloudflare { api_token } => f
                .debug_struct("Cloudflare")
                .field(
                    "api_token",
                    &crate::utils::log_sanitizer::mask_secret(api_token),
                )
                .finish(),
        }
    }
}

// ============ Zone Types ============

/// Status of a zone within the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Zone is active and served by the edge.
    Active,
    /// Zone is waiting for its nameservers to be switched.
    Pending,
    /// Zone is still being set up by the provider.
    Initializing,
    /// Zone nameservers were moved away.
    Moved,
    /// Status could not be determined.
    Unknown,
}

impl ZoneStatus {
    /// Parse the provider's status string; unrecognised values become `Unknown`.
    pub fn from_provider_str(status: &str) -> Self {
        match status {
            "active" => Self::Active,
            "pending" => Self::Pending,
            "initializing" => Self::Initializing,
            "moved" => Self::Moved,
            _ => Self::Unknown,
        }
    }

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Initializing => "initializing",
            Self::Moved => "moved",
            Self::Unknown => "unknown",
        }
    }
}

/// A zone managed by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderZone {
    /// Provider-assigned zone identifier.
    pub id: String,
    /// Zone name (e.g., `"example.com"`).
    pub name: String,
    /// Owning account identifier, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Current zone status.
    pub status: ZoneStatus,
    /// Nameservers assigned by the provider.
    #[serde(default)]
    pub name_servers: Vec<String>,
}

// ============ Zone Settings ============

/// SSL mode between the edge and the origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    /// No TLS anywhere.
    Off,
    /// TLS from visitor to edge only.
    #[default]
    Flexible,
    /// TLS to the origin without certificate validation.
    Full,
    /// TLS to the origin with certificate validation.
    Strict,
}

impl SslMode {
    /// Wire value of the `ssl` zone setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Flexible => "flexible",
            Self::Full => "full",
            Self::Strict => "strict",
        }
    }
}

/// How the visitor's IP address is exposed to the origin (the `pseudo_ipv4` setting).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IpVisibilityMode {
    /// Do not add a pseudo-IPv4 header.
    Off,
    /// Add a `Cf-Pseudo-IPv4` header next to the original.
    AddHeader,
    /// Overwrite the existing client IP headers.
    #[default]
    OverwriteHeader,
}

impl IpVisibilityMode {
    /// Wire value of the `pseudo_ipv4` zone setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::AddHeader => "add_header",
            Self::OverwriteHeader => "overwrite_header",
        }
    }
}

/// Whether every plain HTTP request is redirected to HTTPS (the `always_use_https` setting).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpsMode {
    /// Redirect HTTP to HTTPS.
    #[default]
    On,
    /// Serve plain HTTP.
    Off,
}

impl HttpsMode {
    /// Wire value of the `always_use_https` zone setting.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

// ============ DNS Record Types ============

/// DNS record types the provisioner writes.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
}

impl DnsRecordType {
    /// Pick the record type for a target: IP literals become `A`/`AAAA`, hostnames `CNAME`.
    pub fn for_target(content: &str) -> Self {
        match content.trim().parse::<IpAddr>() {
            Ok(IpAddr::V4(_)) => Self::A,
            Ok(IpAddr::V6(_)) => Self::Aaaa,
            Err(_) => Self::Cname,
        }
    }

    /// Uppercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
        }
    }
}

/// A DNS record to create or update.
///
/// `name` may be a relative label (`"@"`, `"www"`) or a fully qualified name
/// (`"www.example.com"`); providers normalise it against the zone name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecordSpec {
    /// Zone the record belongs to.
    pub site_id: String,
    /// Record host label or full name.
    pub name: String,
    /// Target value.
    pub content: String,
    /// Record type derived from `content`.
    pub record_type: DnsRecordType,
    /// Route traffic through the edge.
    pub proxied: bool,
}

impl DnsRecordSpec {
    /// Build a proxied record whose type is inferred from the target.
    pub fn new(
        site_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            site_id: site_id.into(),
            name: name.into(),
            record_type: DnsRecordType::for_target(&content),
            content,
            proxied: true,
        }
    }
}

/// A DNS record as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Provider-specific record identifier.
    pub id: String,
    /// Zone identifier this record belongs to.
    pub site_id: String,
    /// Record type as reported by the provider (may be outside [`DnsRecordType`]).
    pub record_type: String,
    /// Fully qualified record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// Whether traffic is proxied through the edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxied: Option<bool>,
}

// ============ Forwarding Rule Types ============

/// Default redirect status for forwarding rules.
pub const DEFAULT_FORWARDING_STATUS: u16 = 301;

/// A URL-forwarding page rule to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageruleSpec {
    /// Zone the rule belongs to.
    pub site_id: String,
    /// Matched URL pattern (e.g., `"example.com/*"`).
    pub url: String,
    /// Redirect destination.
    pub forwarding_url: String,
    /// Redirect status code (301 or 302).
    pub status_code: u16,
}

impl PageruleSpec {
    /// Build a permanent-redirect rule.
    pub fn new(
        site_id: impl Into<String>,
        url: impl Into<String>,
        forwarding_url: impl Into<String>,
    ) -> Self {
        Self {
            site_id: site_id.into(),
            url: url.into(),
            forwarding_url: forwarding_url.into(),
            status_code: DEFAULT_FORWARDING_STATUS,
        }
    }

    /// Override the redirect status code.
    #[must_use]
    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }
}

/// A forwarding rule as returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardingRule {
    /// Provider-specific rule identifier.
    pub id: String,
    /// Zone identifier this rule belongs to.
    pub site_id: String,
    /// Matched URL pattern.
    pub url: String,
    /// Redirect destination, if the rule forwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarding_url: Option<String>,
    /// Redirect status code, if the rule forwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}
