use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Per-field change row, always written in the same transaction as its parent
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "audit_log_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub audit_log_id: i64,
    pub field_name: String,
    pub field_label: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub old_value: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub new_value: Option<String>,
    pub change_type: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::audit_log::Entity",
        from = "Column::AuditLogId",
        to = "super::audit_log::Column::Id",
        on_delete = "Cascade"
    )]
    AuditLog,
}

impl Related<super::audit_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuditLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
