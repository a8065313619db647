//! Provider factory functions.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::EdgeProvider;
use crate::types::ProviderCredentials;

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;

/// Creates an [`EdgeProvider`] instance from the given credentials.
///
/// The concrete provider type is determined by the [`ProviderCredentials`] variant.
/// The returned provider is wrapped in `Arc<dyn EdgeProvider>` so workflows and
/// concurrent steps can share it.
///
/// # Errors
///
/// Returns [`ProviderError::NetworkError`](crate::ProviderError::NetworkError) if
/// the HTTP client cannot be built.
///
/// # Examples
///
/// ```rust,no_run
/// use edge_provisioner_provider::{create_provider, ProviderCredentials};
///
/// let provider = create_provider(ProviderCredentials::Cloudflare {
///     api_token: "your-token".to_string(),
/// }).unwrap();
/// assert_eq!(provider.id(), "cloudflare");
/// ```
pub fn create_provider(credentials: ProviderCredentials) -> Result<Arc<dyn EdgeProvider>> {
    log::debug!("Creating provider for {:?}", credentials.provider_type());
    match credentials {
        #[cfg(feature = "cloudflare")]
        ProviderCredentials::Cloudflare { api_token } => {
            Ok(Arc::new(CloudflareProvider::new(api_token)?))
        }
    }
}
