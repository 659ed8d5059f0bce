use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::internal::is_unique_violation;
use crate::errors::InternalError;
use crate::types::db::user_mapping::{self, ActiveModel, Column, Entity as UserMapping};
use crate::types::internal::SystemType;

/// What [`UserMappingStore::upsert_user_mapping`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    /// An active row already existed; nothing was written
    AlreadyActive,
    /// An inactive or deleted row was revived with the new company ids
    Reactivated,
    /// The active row belonged to the user under an earlier username; it now
    /// carries the new username and company ids
    Renamed,
}

impl UpsertOutcome {
    /// True when a row was inserted or updated
    pub fn wrote_row(&self) -> bool {
        !matches!(self, Self::AlreadyActive)
    }
}

/// Per-user, per-system cache of a resolved company mapping
#[derive(Debug, Default)]
pub struct UserMappingStore {}

impl UserMappingStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Mapped company id of the active, non-deleted row for this user and system
    pub async fn get_active_mapping(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        username: &str,
        system_type: SystemType,
    ) -> Result<Option<i64>, InternalError> {
        let row = UserMapping::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Username.eq(username))
            .filter(Column::SystemType.eq(system_type.as_str()))
            .filter(Column::Active.eq(true))
            .filter(Column::Deleted.eq(false))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_active_mapping", e))?;

        Ok(row.map(|r| r.mapped_company_id))
    }

    /// Create, confirm, or revive the mapping row for (user, system)
    ///
    /// Rows are matched on (user_id, system) like the unique index. An active
    /// row stored under another username is renamed in place. Otherwise the
    /// most recent inactive or deleted row gets the new username and company
    /// ids and is made active again. Other rows of the same user are left
    /// untouched.
    pub async fn upsert_user_mapping(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        username: &str,
        source_company_id: i64,
        mapped_company_id: i64,
        system_type: SystemType,
    ) -> Result<UpsertOutcome, InternalError> {
        let rows = UserMapping::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SystemType.eq(system_type.as_str()))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_user_mappings", e))?;

        let now = Utc::now();
        if let Some(active) = rows.iter().find(|r| r.active && !r.deleted) {
            if active.username == username {
                return Ok(UpsertOutcome::AlreadyActive);
            }

            let row_id = active.id;
            let previous = active.username.clone();
            let mut active_model: ActiveModel = active.clone().into();
            active_model.username = Set(username.to_string());
            active_model.mapped_company_id = Set(mapped_company_id);
            active_model.source_company_id = Set(source_company_id);
            active_model.updated_at = Set(now);
            active_model
                .update(conn)
                .await
                .map_err(|e| InternalError::database("rename_user_mapping", e))?;

            tracing::info!(
                "Renamed user mapping #{} for user {} in {}: '{}' -> '{}'",
                row_id,
                user_id,
                system_type,
                previous,
                username
            );
            return Ok(UpsertOutcome::Renamed);
        }

        if let Some(stale) = rows.into_iter().next() {
            let row_id = stale.id;
            let mut active_model: ActiveModel = stale.into();
            active_model.username = Set(username.to_string());
            active_model.mapped_company_id = Set(mapped_company_id);
            active_model.source_company_id = Set(source_company_id);
            active_model.active = Set(true);
            active_model.deleted = Set(false);
            active_model.updated_at = Set(now);

            return match active_model.update(conn).await {
                Ok(_) => {
                    tracing::info!(
                        "Reactivated user mapping #{} for user {} in {} -> company {}",
                        row_id,
                        user_id,
                        system_type,
                        mapped_company_id
                    );
                    Ok(UpsertOutcome::Reactivated)
                }
                Err(e) if is_unique_violation(&e) => Ok(UpsertOutcome::AlreadyActive),
                Err(e) => Err(InternalError::database("reactivate_user_mapping", e)),
            };
        }

        let active_model = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            user_id: Set(user_id),
            username: Set(username.to_string()),
            mapped_company_id: Set(mapped_company_id),
            source_company_id: Set(source_company_id),
            system_type: Set(system_type.as_str().to_string()),
            active: Set(true),
            deleted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match active_model.insert(conn).await {
            Ok(created) => {
                tracing::info!(
                    "Created user mapping #{} for user {} in {} -> company {}",
                    created.id,
                    user_id,
                    system_type,
                    mapped_company_id
                );
                Ok(UpsertOutcome::Created)
            }
            // Concurrent first resolution for the same user already wrote the row
            Err(e) if is_unique_violation(&e) => Ok(UpsertOutcome::AlreadyActive),
            Err(e) => Err(InternalError::database("insert_user_mapping", e)),
        }
    }

    /// Mark the active mapping for (user, system) inactive, keeping the row as history
    ///
    /// # Returns
    /// Number of rows deactivated (0 or 1)
    pub async fn deactivate_user_mapping(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        system_type: SystemType,
    ) -> Result<u64, InternalError> {
        let result = UserMapping::update_many()
            .col_expr(Column::Active, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(Utc::now()))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SystemType.eq(system_type.as_str()))
            .filter(Column::Active.eq(true))
            .filter(Column::Deleted.eq(false))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("deactivate_user_mapping", e))?;

        Ok(result.rows_affected)
    }

    /// All rows for a user and system, newest first
    pub async fn history(
        &self,
        conn: &impl ConnectionTrait,
        user_id: i64,
        system_type: SystemType,
    ) -> Result<Vec<user_mapping::Model>, InternalError> {
        UserMapping::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::SystemType.eq(system_type.as_str()))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("user_mapping_history", e))
    }
}
