use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AuditLogs::Id).big_integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(AuditLogs::CompanyId).big_integer())
                    .col(ColumnDef::new(AuditLogs::System).string())
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer())
                    .col(ColumnDef::new(AuditLogs::Username).string())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).string())
                    .col(ColumnDef::new(AuditLogs::EntityName).string())
                    .col(ColumnDef::new(AuditLogs::Description).text().not_null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string())
                    .col(ColumnDef::new(AuditLogs::UserAgent).text())
                    .col(ColumnDef::new(AuditLogs::RequestId).string())
                    .col(ColumnDef::new(AuditLogs::RequestData).json())
                    .col(ColumnDef::new(AuditLogs::ResponseData).json())
                    .col(ColumnDef::new(AuditLogs::Status).string().not_null().default("success"))
                    .col(ColumnDef::new(AuditLogs::ErrorMessage).text())
                    .col(ColumnDef::new(AuditLogs::Metadata).json())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AuditLogDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogDetails::AuditLogId).big_integer().not_null())
                    .col(ColumnDef::new(AuditLogDetails::FieldName).string().not_null())
                    .col(ColumnDef::new(AuditLogDetails::FieldLabel).string().not_null())
                    .col(ColumnDef::new(AuditLogDetails::OldValue).text())
                    .col(ColumnDef::new(AuditLogDetails::NewValue).text())
                    .col(ColumnDef::new(AuditLogDetails::ChangeType).string().not_null())
                    .col(
                        ColumnDef::new(AuditLogDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_log_details_audit_log_id")
                            .from(AuditLogDetails::Table, AuditLogDetails::AuditLogId)
                            .to(AuditLogs::Table, AuditLogs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_audit_logs_company_id", AuditLogs::CompanyId),
            ("idx_audit_logs_user_id", AuditLogs::UserId),
            ("idx_audit_logs_action", AuditLogs::Action),
            ("idx_audit_logs_entity_type", AuditLogs::EntityType),
            ("idx_audit_logs_created_at", AuditLogs::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(AuditLogs::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_audit_log_details_field")
                    .table(AuditLogDetails::Table)
                    .col(AuditLogDetails::AuditLogId)
                    .col(AuditLogDetails::FieldName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogDetails::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    CompanyId,
    System,
    UserId,
    Username,
    Action,
    EntityType,
    EntityId,
    EntityName,
    Description,
    IpAddress,
    UserAgent,
    RequestId,
    RequestData,
    ResponseData,
    Status,
    ErrorMessage,
    Metadata,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AuditLogDetails {
    Table,
    Id,
    AuditLogId,
    FieldName,
    FieldLabel,
    OldValue,
    NewValue,
    ChangeType,
    CreatedAt,
}
