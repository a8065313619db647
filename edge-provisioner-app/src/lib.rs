//! Platform-agnostic application bootstrap for edge-provisioner.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter
//! injection) and `AppConfig` (configuration file + environment overrides).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use anyhow::Context;

use edge_provisioner_core::error::{CoreError, CoreResult};
use edge_provisioner_core::services::{
    CreateSiteWorkflow, NameserverCheckGuard, ServiceContext, SiteService, UpdateSiteWorkflow,
};
use edge_provisioner_core::traits::{CacheInvalidator, SiteRepository};
use edge_provisioner_core::ProvisionerConfig;
use edge_provisioner_provider::EdgeProvider;

use adapters::{InMemorySiteRepository, NoopCacheInvalidator};
pub use config::{AppConfig, StorageBackend};

/// Platform-agnostic application state.
///
/// Holds the `ServiceContext` and one instance of every workflow. Every
/// frontend constructs this once at startup via `AppStateBuilder` or
/// [`AppState::from_config`].
pub struct AppState {
    /// Service context (provider, storage, cache hook, config, locks)
    pub ctx: Arc<ServiceContext>,
    /// Site creation workflow
    pub create_workflow: CreateSiteWorkflow,
    /// Site update workflow
    pub update_workflow: UpdateSiteWorkflow,
    /// Nameserver check
    pub nameserver_guard: NameserverCheckGuard,
    /// Site queries
    pub site_service: SiteService,
}

impl AppState {
    /// Wire the state from a loaded configuration.
    ///
    /// Builds the Cloudflare client from the configured token and opens the
    /// configured storage backend. Credentials are not verified here.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let provider = edge_provisioner_provider::create_provider(config.credentials()?)
            .context("Failed to create the provider client")?;
        let provisioner_config = config.provisioner_config()?;
        let site_repository = open_site_repository(config).await?;

        let state = AppStateBuilder::new()
            .provider(provider)
            .site_repository(site_repository)
            .config(provisioner_config)
            .build()?;
        log::info!(
            "Application state ready ({} storage)",
            match config.storage.backend {
                StorageBackend::Memory => "memory",
                StorageBackend::Sqlite => "sqlite",
            }
        );
        Ok(state)
    }
}

#[cfg(feature = "sqlite-store")]
async fn open_site_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn SiteRepository>> {
    Ok(match config.storage.backend {
        StorageBackend::Memory => Arc::new(InMemorySiteRepository::new()),
        StorageBackend::Sqlite => {
            let path = config.sqlite_path()?;
            let store = adapters::SqliteStore::new(&path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Arc::new(store)
        }
    })
}

#[cfg(not(feature = "sqlite-store"))]
async fn open_site_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn SiteRepository>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemorySiteRepository::new())),
        StorageBackend::Sqlite => {
            anyhow::bail!("SQLite storage requires the `sqlite-store` feature")
        }
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required
/// - `provider` — the edge provider client
/// - `site_repository` — how sites are stored
/// - `config` — account and new-zone settings
///
/// # Optional
/// - `cache_invalidator` — defaults to `NoopCacheInvalidator`
pub struct AppStateBuilder {
    provider: Option<Arc<dyn EdgeProvider>>,
    site_repository: Option<Arc<dyn SiteRepository>>,
    cache_invalidator: Option<Arc<dyn CacheInvalidator>>,
    config: Option<ProvisionerConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            provider: None,
            site_repository: None,
            cache_invalidator: None,
            config: None,
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn EdgeProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn site_repository(mut self, repo: Arc<dyn SiteRepository>) -> Self {
        self.site_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn cache_invalidator(mut self, invalidator: Arc<dyn CacheInvalidator>) -> Self {
        self.cache_invalidator = Some(invalidator);
        self
    }

    #[must_use]
    pub fn config(mut self, config: ProvisionerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing,
    /// or `CoreError::ConfigError` if the config is invalid.
    pub fn build(self) -> CoreResult<AppState> {
        let provider = self
            .provider
            .ok_or_else(|| CoreError::ValidationError("provider is required".to_string()))?;
        let site_repository = self.site_repository.ok_or_else(|| {
            CoreError::ValidationError("site_repository is required".to_string())
        })?;
        let cache_invalidator = self
            .cache_invalidator
            .unwrap_or_else(|| Arc::new(NoopCacheInvalidator));
        let config = self
            .config
            .ok_or_else(|| CoreError::ValidationError("config is required".to_string()))?;
        config.validate()?;

        let ctx = Arc::new(ServiceContext::new(
            provider,
            site_repository,
            cache_invalidator,
            config,
        ));

        Ok(AppState {
            create_workflow: CreateSiteWorkflow::new(Arc::clone(&ctx)),
            update_workflow: UpdateSiteWorkflow::new(Arc::clone(&ctx)),
            nameserver_guard: NameserverCheckGuard::new(Arc::clone(&ctx)),
            site_service: SiteService::new(Arc::clone(&ctx)),
            ctx,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
