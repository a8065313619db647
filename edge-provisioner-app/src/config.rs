//! Application configuration (TOML + environment overrides).
//!
//! ```toml
//! [provider]
//! api_token = "..."
//!
//! [provisioning]
//! account_id = "..."
//! ssl_mode = "flexible"
//! ip_visibility = "overwrite_header"
//! https_mode = "on"
//! forwarding_status_code = 301
//!
//! [storage]
//! backend = "sqlite"
//! sqlite_path = "/var/lib/edge-provisioner/sites.db"
//!
//! [log]
//! level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use edge_provisioner_core::{ProvisionerConfig, SecurityProfile};
use edge_provisioner_provider::{
    DEFAULT_FORWARDING_STATUS, HttpsMode, IpVisibilityMode, ProviderCredentials, SslMode,
};

/// Overrides `[provider] api_token`.
pub const ENV_API_TOKEN: &str = "EDGE_PROVISIONER_API_TOKEN";
/// Overrides `[provisioning] account_id`.
pub const ENV_ACCOUNT_ID: &str = "EDGE_PROVISIONER_ACCOUNT_ID";

const APP_DIR: &str = "edge-provisioner";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderSection,
    pub provisioning: ProvisioningSection,
    pub storage: StorageSection,
    pub log: LogSection,
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// Cloudflare API token.
    pub api_token: String,
}

impl std::fmt::Debug for ProviderSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSection")
            .field(
                "api_token",
                &edge_provisioner_provider::mask_secret(&self.api_token),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningSection {
    /// Account new zones are created under.
    pub account_id: String,
    pub ssl_mode: SslMode,
    pub ip_visibility: IpVisibilityMode,
    pub https_mode: HttpsMode,
    pub forwarding_status_code: u16,
}

impl Default for ProvisioningSection {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            ssl_mode: SslMode::default(),
            ip_visibility: IpVisibilityMode::default(),
            https_mode: HttpsMode::default(),
            forwarding_status_code: DEFAULT_FORWARDING_STATUS,
        }
    }
}

/// 站点存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Sites live for the lifetime of the process.
    #[default]
    Memory,
    /// Sites are kept in a local `SQLite` file (`sqlite-store` feature).
    Sqlite,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    /// Defaults to `sites.db` under the platform data directory.
    pub sqlite_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// `<config dir>/edge-provisioner/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Parse a TOML document. No environment overrides are applied.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid configuration file")
    }

    /// Load the configuration.
    ///
    /// An explicit `path` must exist. Without one the default path is used
    /// when present, otherwise built-in defaults. Environment overrides are
    /// applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::read(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::read(&default)?,
                None => {
                    log::debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `EDGE_PROVISIONER_*` overrides; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(ENV_API_TOKEN).filter(|v| !v.trim().is_empty()) {
            self.provider.api_token = token;
        }
        if let Some(account) = lookup(ENV_ACCOUNT_ID).filter(|v| !v.trim().is_empty()) {
            self.provisioning.account_id = account;
        }
    }

    /// Provider credentials; fails when no token is configured.
    pub fn credentials(&self) -> Result<ProviderCredentials> {
        let api_token = self.provider.api_token.trim();
        if api_token.is_empty() {
            bail!("No API token configured (set [provider] api_token or {ENV_API_TOKEN})");
        }
        Ok(ProviderCredentials::Cloudflare {
            api_token: api_token.to_string(),
        })
    }

    /// Validated workflow configuration.
    pub fn provisioner_config(&self) -> Result<ProvisionerConfig> {
        let section = &self.provisioning;
        let config = ProvisionerConfig::new(section.account_id.trim())
            .with_context(|| format!("Invalid [provisioning] section (or {ENV_ACCOUNT_ID})"))?
            .with_security(SecurityProfile {
                ssl_mode: section.ssl_mode,
                ip_visibility: section.ip_visibility,
                https_mode: section.https_mode,
            })
            .with_forwarding_status_code(section.forwarding_status_code)
            .context("Invalid [provisioning] section")?;
        Ok(config)
    }

    /// Resolved `SQLite` database path.
    pub fn sqlite_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.sqlite_path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join("sites.db"))
            .context("Cannot determine the data directory; set [storage] sqlite_path")
    }
}
