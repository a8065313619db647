//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use edge_provisioner_provider::ProviderError;

/// Core layer error type
///
/// Workflow outcomes are reported through `ProvisioningResult`; this type covers
/// infrastructure failures around them (storage, configuration, provider calls
/// made outside a workflow).
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Site not found
    #[error("Site not found: {0}")]
    SiteNotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Provider error (converting from library)
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::SiteNotFound(_) | Self::ValidationError(_) | Self::ConfigError(_) => true,
            Self::Provider(e) => e.is_expected(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_keep_their_classification() {
        let throttled: CoreError = ProviderError::NameserverCheckThrottled {
            provider: "cloudflare".into(),
            zone: "z".into(),
            raw_message: None,
        }
        .into();
        let network: CoreError = ProviderError::NetworkError {
            provider: "cloudflare".into(),
            detail: "refused".into(),
        }
        .into();

        assert!(throttled.is_expected());
        assert!(!network.is_expected());
    }

    #[test]
    fn storage_errors_are_unexpected() {
        assert!(!CoreError::StorageError("disk full".into()).is_expected());
        assert!(CoreError::SiteNotFound("abc".into()).is_expected());
    }

    #[test]
    fn serialized_form_is_tagged() {
        let json = serde_json::to_value(CoreError::SiteNotFound("abc".into())).unwrap();
        assert_eq!(json["code"], "SiteNotFound");
        assert_eq!(json["details"], "abc");
    }
}
