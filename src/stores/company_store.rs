use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::internal::{is_unique_violation, CompanyError};
use crate::errors::InternalError;
use crate::types::db::company::{self, ActiveModel, Entity as Company};
use crate::types::internal::SystemType;

/// Provisioning request for a company
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub external_id: i64,
    pub system: SystemType,
    pub name: Option<String>,
}

/// Tenant directory: registry of companies keyed by (external id, system)
#[derive(Debug, Default)]
pub struct CompanyStore {}

impl CompanyStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Find the live company with this external id in this system
    ///
    /// Soft-deleted rows and rows owned by another system are never returned.
    ///
    /// # Returns
    /// * `Ok(Some(Model))` - Live company found
    /// * `Ok(None)` - No such live company
    /// * `Err(InternalError)` - Database error
    pub async fn find_company(
        &self,
        conn: &impl ConnectionTrait,
        external_id: i64,
        system: SystemType,
    ) -> Result<Option<company::Model>, InternalError> {
        Company::find()
            .filter(company::Column::ExternalId.eq(external_id))
            .filter(company::Column::System.eq(system.as_str()))
            .filter(company::Column::Deleted.eq(false))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_company", e))
    }

    /// Convenience wrapper over [`Self::find_company`]
    pub async fn is_live(
        &self,
        conn: &impl ConnectionTrait,
        external_id: i64,
        system: SystemType,
    ) -> Result<bool, InternalError> {
        Ok(self.find_company(conn, external_id, system).await?.is_some())
    }

    /// Register a company
    ///
    /// # Returns
    /// * `Ok(Model)` - The created company
    /// * `Err(CompanyError::DuplicateCompany)` - A live company already uses (external_id, system)
    pub async fn register_company(
        &self,
        conn: &impl ConnectionTrait,
        new_company: NewCompany,
    ) -> Result<company::Model, InternalError> {
        if self.is_live(conn, new_company.external_id, new_company.system).await? {
            return Err(CompanyError::DuplicateCompany {
                external_id: new_company.external_id,
                system: new_company.system.to_string(),
            }
            .into());
        }

        let now = Utc::now();
        let model = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            external_id: Set(new_company.external_id),
            system: Set(new_company.system.as_str().to_string()),
            name: Set(new_company.name),
            status: Set("active".to_string()),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = model.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                CompanyError::DuplicateCompany {
                    external_id: new_company.external_id,
                    system: new_company.system.to_string(),
                }
                .into()
            } else {
                InternalError::database("register_company", e)
            }
        })?;

        tracing::info!(
            "Registered company {} in {} (internal id {})",
            created.external_id,
            created.system,
            created.id
        );

        Ok(created)
    }

    /// Soft-delete a company
    ///
    /// # Returns
    /// * `Ok(true)` - A live company was marked deleted
    /// * `Ok(false)` - No live company matched
    pub async fn soft_delete_company(
        &self,
        conn: &impl ConnectionTrait,
        external_id: i64,
        system: SystemType,
    ) -> Result<bool, InternalError> {
        let Some(existing) = self.find_company(conn, external_id, system).await? else {
            return Ok(false);
        };

        let mut active_model: ActiveModel = existing.into();
        active_model.deleted = Set(true);
        active_model.status = Set("inactive".to_string());
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_company", e))?;

        tracing::info!("Soft-deleted company {} in {}", external_id, system);

        Ok(true)
    }
}
