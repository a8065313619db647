//! # edge-provisioner-provider
//!
//! Edge provider abstraction used by the site provisioning workflows.
//!
//! An edge provider hosts a customer's zone and fronts it with a CDN: it owns
//! the zone lifecycle, zone security settings, DNS records, URL-forwarding
//! (page) rules and nameserver verification. Workflows talk to it exclusively
//! through the [`EdgeProvider`] trait.
//!
//! ## Supported Providers
//!
//! | Provider | Feature Flag | Auth Method |
//! |----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | `cloudflare` | Bearer Token |
//!
//! ## Feature Flags
//!
//! - **`cloudflare`** *(default)* — Enable the Cloudflare provider.
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use edge_provisioner_provider::{
//!     create_provider, DnsRecordSpec, EdgeProvider, ProviderCredentials, SslMode,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = create_provider(ProviderCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!     })?;
//!
//!     let zone = provider.create_zone("example.com", "your-account-id").await?;
//!     provider.set_ssl_mode(&zone.id, SslMode::Flexible).await?;
//!     provider
//!         .create_dns_record(&DnsRecordSpec::new(&zone.id, "@", "1.2.3.4"))
//!         .await?;
//!     println!("point your domain at {:?}", zone.name_servers);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! Raw provider error codes are mapped once, inside the provider, so callers
//! classify failures by variant:
//!
//! - [`ProviderError::ZoneAlreadyExists`] — the zone is already registered
//! - [`ProviderError::ZoneCreationThrottled`] — the zone was added too many times recently
//! - [`ProviderError::NameserverCheckThrottled`] — nameserver checks are limited to once per hour
//! - [`ProviderError::InvalidCredentials`] — authentication failed
//!
//! Nothing is retried automatically.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_provider;

// Re-export core trait only (internal traits are not exported)
pub use traits::EdgeProvider;

// Re-export types
pub use types::{
    DEFAULT_FORWARDING_STATUS, DnsRecord, DnsRecordSpec, DnsRecordType, ForwardingRule, HttpsMode,
    IpVisibilityMode, PageruleSpec, PaginatedResponse, PaginationParams, ProviderCredentials,
    ProviderType, ProviderZone, SslMode, ZoneStatus,
};

// Re-export log helpers for downstream crates
pub use utils::log_sanitizer::mask_secret;

// Re-export concrete providers (behind feature flags)
#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;
