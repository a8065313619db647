//! `SiteRepository` implementation for `SqliteStore`.

use async_trait::async_trait;
use sea_orm::{ActiveValue::Set, EntityTrait, QueryOrder};

use edge_provisioner_core::error::{CoreError, CoreResult};
use edge_provisioner_core::traits::SiteRepository;
use edge_provisioner_core::types::{Site, ZoneStatus};
use edge_provisioner_core::utils::datetime::parse_rfc3339;

use super::SqliteStore;
use super::entity::site;

impl site::Model {
    /// Convert a `SeaORM` row model into a domain `Site`.
    fn into_site(self) -> CoreResult<Site> {
        let created_at = parse_rfc3339(&self.created_at)
            .map_err(|e| CoreError::SerializationError(format!("Invalid created_at: {e}")))?;
        let name_servers: Vec<String> = serde_json::from_str(&self.name_servers)
            .map_err(|e| CoreError::SerializationError(format!("Invalid name_servers: {e}")))?;

        Ok(Site {
            id: self.id,
            name: self.name,
            account_id: self.account_id,
            status: ZoneStatus::from_provider_str(&self.status),
            name_servers,
            created_at,
        })
    }
}

fn site_to_active_model(site: &Site) -> CoreResult<site::ActiveModel> {
    let name_servers = serde_json::to_string(&site.name_servers)
        .map_err(|e| CoreError::SerializationError(e.to_string()))?;

    Ok(site::ActiveModel {
        id: Set(site.id.clone()),
        name: Set(site.name.clone()),
        account_id: Set(site.account_id.clone()),
        status: Set(site.status.as_str().to_string()),
        name_servers: Set(name_servers),
        created_at: Set(site.created_at.to_rfc3339()),
    })
}

#[async_trait]
impl SiteRepository for SqliteStore {
    async fn find_all(&self) -> CoreResult<Vec<Site>> {
        let rows = site::Entity::find()
            .order_by_asc(site::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query sites: {e}")))?;

        rows.into_iter().map(site::Model::into_site).collect()
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Site>> {
        let row = site::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to query site: {e}")))?;

        row.map(site::Model::into_site).transpose()
    }

    async fn save(&self, site: &Site) -> CoreResult<()> {
        let active_model = site_to_active_model(site)?;

        // created_at 保持首次登记时间
        site::Entity::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(site::Column::Id)
                    .update_columns([
                        site::Column::Name,
                        site::Column::AccountId,
                        site::Column::Status,
                        site::Column::NameServers,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to save site: {e}")))?;

        Ok(())
    }
}
