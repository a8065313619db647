use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Site::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Site::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Site::Name).string().not_null())
                    .col(ColumnDef::new(Site::AccountId).string().not_null())
                    .col(ColumnDef::new(Site::Status).string().not_null())
                    .col(
                        ColumnDef::new(Site::NameServers)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Site::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // 按名称查找
        manager
            .create_index(
                Index::create()
                    .name("idx_sites_name")
                    .table(Site::Table)
                    .col(Site::Name)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Site::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Site {
    #[sea_orm(iden = "sites")]
    Table,
    Id,
    Name,
    AccountId,
    Status,
    NameServers,
    CreatedAt,
}
