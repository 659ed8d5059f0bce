use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A tenant company as known to one product system.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// System-scoped numeric id (what the owning system calls this company)
    pub external_id: i64,
    pub system: String,
    pub name: Option<String>,
    pub status: String,
    pub deleted: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
