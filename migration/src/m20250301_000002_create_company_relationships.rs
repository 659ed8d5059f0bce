use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyRelationships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyRelationships::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyRelationships::CompanyFrom).big_integer().not_null())
                    .col(ColumnDef::new(CompanyRelationships::CompanyTo).big_integer().not_null())
                    .col(ColumnDef::new(CompanyRelationships::RelationshipType).string().not_null())
                    .col(
                        ColumnDef::new(CompanyRelationships::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(CompanyRelationships::IsPrimary)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CompanyRelationships::StartDate).date().not_null())
                    .col(ColumnDef::new(CompanyRelationships::EndDate).date())
                    .col(ColumnDef::new(CompanyRelationships::Metadata).json())
                    .col(
                        ColumnDef::new(CompanyRelationships::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CompanyRelationships::CreatedBy).string())
                    .col(ColumnDef::new(CompanyRelationships::UpdatedBy).string())
                    .col(
                        ColumnDef::new(CompanyRelationships::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyRelationships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(CompanyRelationships::CompanyFrom).ne(Expr::col(CompanyRelationships::CompanyTo)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_company_relationships_from_type")
                    .table(CompanyRelationships::Table)
                    .col(CompanyRelationships::CompanyFrom)
                    .col(CompanyRelationships::RelationshipType)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_company_relationships_to_type")
                    .table(CompanyRelationships::Table)
                    .col(CompanyRelationships::CompanyTo)
                    .col(CompanyRelationships::RelationshipType)
                    .to_owned(),
            )
            .await?;

        let conn = manager.get_connection();

        // At most one open edge per (from, to, type).
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_company_relationships_open \
             ON company_relationships (company_from, company_to, relationship_type) \
             WHERE end_date IS NULL AND deleted = FALSE",
        )
        .await?;

        // At most one open primary edge per (from, type).
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_company_relationships_open_primary \
             ON company_relationships (company_from, relationship_type) \
             WHERE is_primary = TRUE AND end_date IS NULL AND deleted = FALSE",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyRelationships::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CompanyRelationships {
    Table,
    Id,
    CompanyFrom,
    CompanyTo,
    RelationshipType,
    Status,
    IsPrimary,
    StartDate,
    EndDate,
    Metadata,
    Deleted,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}
