use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Directed, typed edge between two companies.
///
/// `company_from` / `company_to` hold system-scoped external ids, not
/// `companies.id`, so an edge survives re-provisioning of either side.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "company_relationships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company_from: i64,
    pub company_to: i64,
    pub relationship_type: String,
    pub status: String,
    pub is_primary: bool,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub metadata: Option<Json>,
    pub deleted: bool,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Open edges have no end date and are not soft-deleted.
    pub fn is_open(&self) -> bool {
        self.end_date.is_none() && !self.deleted
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
