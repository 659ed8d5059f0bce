use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserMappings::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserMappings::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(UserMappings::UserId).big_integer().not_null())
                    .col(ColumnDef::new(UserMappings::Username).string().not_null())
                    .col(ColumnDef::new(UserMappings::MappedCompanyId).big_integer().not_null())
                    .col(ColumnDef::new(UserMappings::SourceCompanyId).big_integer().not_null())
                    .col(ColumnDef::new(UserMappings::SystemType).string().not_null())
                    .col(ColumnDef::new(UserMappings::Active).boolean().not_null().default(true))
                    .col(ColumnDef::new(UserMappings::Deleted).boolean().not_null().default(false))
                    .col(ColumnDef::new(UserMappings::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(UserMappings::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_mappings_user_system")
                    .table(UserMappings::Table)
                    .col(UserMappings::UserId)
                    .col(UserMappings::Username)
                    .col(UserMappings::SystemType)
                    .to_owned(),
            )
            .await?;

        // One authoritative mapping per (user, system); older rows are kept
        // inactive for history.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_user_mappings_active \
                 ON user_mappings (user_id, system_type) \
                 WHERE active = TRUE AND deleted = FALSE",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserMappings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserMappings {
    Table,
    Id,
    UserId,
    Username,
    MappedCompanyId,
    SourceCompanyId,
    SystemType,
    Active,
    Deleted,
    CreatedAt,
    UpdatedAt,
}
