//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

const UNKNOWN: &str = "<unknown>";

/// Cloudflare error code mapping
/// Reference: <https://developers.cloudflare.com/fundamentals/api/reference/>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let zone = || context.zone.clone().unwrap_or_else(|| UNKNOWN.to_string());

        match raw.code.as_deref() {
            // Zone lifecycle
            // 1061: <name> already exists
            Some("1061") => ProviderError::ZoneAlreadyExists {
                provider,
                zone: zone(),
                raw_message: Some(raw.message),
            },
            // 1105: zone has been added too many times, wait before retrying
            Some("1105") => ProviderError::ZoneCreationThrottled {
                provider,
                zone: zone(),
                raw_message: Some(raw.message),
            },
            // 1224: activation check may only be requested once per hour
            Some("1224") => ProviderError::NameserverCheckThrottled {
                provider,
                zone: zone(),
                raw_message: Some(raw.message),
            },

            // Authentication
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("6003" | "6103" | "6111" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // Invalid parameter
            // 1004: DNS Validation Error
            // 1049: not a registered domain
            // 9000: Invalid or missing name
            // 9005 / 9006: content is not a valid IPv4 / IPv6 address
            // 9021: Invalid TTL
            // 9041: This DNS record cannot be proxied
            Some(code @ ("1004" | "1049" | "9000" | "9005" | "9006" | "9021" | "9041")) => {
                let param = match code {
                    "1049" | "9000" => "name",
                    "9005" | "9006" => "content",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider,
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053..81058: a record with that host / settings already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider,
                    record_name: context.record_name.unwrap_or_else(|| UNKNOWN.to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider,
                record_id: context
                    .record_id
                    .or(context.record_name)
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                raw_message: Some(raw.message),
            },

            // 81045: The record quota has been exceeded
            Some("81045") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            // 7000: No route for that URI
            // 7003: Could not route, perhaps the object identifier is invalid
            Some("7000" | "7003") => ProviderError::ZoneNotFound {
                provider,
                zone: zone(),
                raw_message: Some(raw.message),
            },

            _ => self.unknown_error(raw),
        }
    }
}
