//! 预配置参数
//!
//! Values the workflows read but do not own: the account new zones are
//! created under and the settings applied to every new zone.

use serde::{Deserialize, Serialize};

use edge_provisioner_provider::{
    DEFAULT_FORWARDING_STATUS, HttpsMode, IpVisibilityMode, SslMode,
};

use crate::error::{CoreError, CoreResult};

/// Security settings applied right after a zone is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityProfile {
    /// Edge-to-origin SSL mode.
    pub ssl_mode: SslMode,
    /// Client IP exposure to the origin.
    pub ip_visibility: IpVisibilityMode,
    /// HTTP → HTTPS redirect.
    pub https_mode: HttpsMode,
}

/// Workflow configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionerConfig {
    /// Provider account new zones are registered under.
    pub account_id: String,
    /// Settings applied to new zones.
    #[serde(default)]
    pub security: SecurityProfile,
    /// Redirect status used for forwarding rules.
    #[serde(default = "default_forwarding_status")]
    pub forwarding_status_code: u16,
}

fn default_forwarding_status() -> u16 {
    DEFAULT_FORWARDING_STATUS
}

impl ProvisionerConfig {
    /// 使用默认安全设置创建配置
    pub fn new(account_id: impl Into<String>) -> CoreResult<Self> {
        let config = Self {
            account_id: account_id.into(),
            security: SecurityProfile::default(),
            forwarding_status_code: DEFAULT_FORWARDING_STATUS,
        };
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_security(mut self, security: SecurityProfile) -> Self {
        self.security = security;
        self
    }

    pub fn with_forwarding_status_code(mut self, status_code: u16) -> CoreResult<Self> {
        self.forwarding_status_code = status_code;
        self.validate()?;
        Ok(self)
    }

    /// 校验配置
    ///
    /// The account id must be non-blank and the forwarding status a redirect
    /// code Cloudflare accepts (301 or 302).
    pub fn validate(&self) -> CoreResult<()> {
        if self.account_id.trim().is_empty() {
            return Err(CoreError::ConfigError("account id is required".to_string()));
        }
        if !matches!(self.forwarding_status_code, 301 | 302) {
            return Err(CoreError::ConfigError(format!(
                "forwarding status code must be 301 or 302, got {}",
                self.forwarding_status_code
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_new_zone_policy() {
        let config = ProvisionerConfig::new("acc-1").unwrap();
        assert_eq!(config.security.ssl_mode, SslMode::Flexible);
        assert_eq!(config.security.ip_visibility, IpVisibilityMode::OverwriteHeader);
        assert_eq!(config.security.https_mode, HttpsMode::On);
        assert_eq!(config.forwarding_status_code, 301);
    }

    #[test]
    fn blank_account_is_rejected() {
        assert!(matches!(
            ProvisionerConfig::new("  "),
            Err(CoreError::ConfigError(_))
        ));
    }

    #[test]
    fn only_redirect_codes_are_accepted() {
        let config = ProvisionerConfig::new("acc-1").unwrap();
        assert_eq!(
            config
                .clone()
                .with_forwarding_status_code(302)
                .unwrap()
                .forwarding_status_code,
            302
        );
        assert!(config.with_forwarding_status_code(200).is_err());
    }

    #[test]
    fn deserializes_with_partial_security() {
        let config: ProvisionerConfig = serde_json::from_str(
            r#"{"accountId": "acc-1", "security": {"sslMode": "full"}}"#,
        )
        .unwrap();
        assert_eq!(config.security.ssl_mode, SslMode::Full);
        assert_eq!(config.security.https_mode, HttpsMode::On);
        assert_eq!(config.forwarding_status_code, 301);
    }
}
