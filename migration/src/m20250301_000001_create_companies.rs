use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Companies::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Companies::ExternalId).big_integer().not_null())
                    .col(ColumnDef::new(Companies::System).string().not_null())
                    .col(ColumnDef::new(Companies::Name).string())
                    .col(ColumnDef::new(Companies::Status).string().not_null().default("active"))
                    .col(ColumnDef::new(Companies::Deleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(Companies::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Companies::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_companies_external_id_system")
                    .table(Companies::Table)
                    .col(Companies::ExternalId)
                    .col(Companies::System)
                    .to_owned(),
            )
            .await?;

        // (external_id, system) is unique among live rows only; soft-deleted
        // rows keep their ids so a company can be re-provisioned.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_companies_live_external_id \
                 ON companies (external_id, system) WHERE deleted = FALSE",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    ExternalId,
    System,
    Name,
    Status,
    Deleted,
    CreatedAt,
    UpdatedAt,
}
