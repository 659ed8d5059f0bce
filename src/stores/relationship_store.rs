use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
};

use crate::errors::internal::{is_unique_violation, RelationshipError};
use crate::errors::InternalError;
use crate::types::db::company_relationship::{self, ActiveModel, Column, Entity as CompanyRelationship};
use crate::types::internal::{NewRelationship, RelationshipStatus, RelationshipType};

/// Relationship graph store: directed, typed, time-bounded edges between companies
///
/// Uniqueness of open edges and open primary edges is guarded by partial
/// unique indexes; this store re-checks before writing and converts index
/// violations into [`RelationshipError::ConstraintViolation`], except for
/// [`Self::upsert_edge`] where a violation means a concurrent caller created
/// the same edge first.
#[derive(Debug, Default)]
pub struct RelationshipStore {}

impl RelationshipStore {
    pub fn new() -> Self {
        Self {}
    }

    /// Open edges ordered by the tie-break rule: primary first, then most recent start date
    fn open_edges() -> Select<CompanyRelationship> {
        CompanyRelationship::find()
            .filter(Column::EndDate.is_null())
            .filter(Column::Deleted.eq(false))
            .order_by_desc(Column::IsPrimary)
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id)
    }

    /// Find the open edge leaving `from` with the given type
    ///
    /// When several edges are open, primary edges win, then the most recent
    /// `start_date`.
    pub async fn find_open_edge(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        relationship_type: RelationshipType,
    ) -> Result<Option<company_relationship::Model>, InternalError> {
        Self::open_edges()
            .filter(Column::CompanyFrom.eq(from))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_open_edge", e))
    }

    /// Find the open edge arriving at `to` with the given type, same tie-break
    pub async fn find_open_edge_by_target(
        &self,
        conn: &impl ConnectionTrait,
        to: i64,
        relationship_type: RelationshipType,
    ) -> Result<Option<company_relationship::Model>, InternalError> {
        Self::open_edges()
            .filter(Column::CompanyTo.eq(to))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_open_edge_by_target", e))
    }

    pub async fn find_edge_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<company_relationship::Model>, InternalError> {
        CompanyRelationship::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_edge_by_id", e))
    }

    /// Edges leaving `from` that were in effect on `on_date`
    ///
    /// Includes edges closed later than `on_date`; soft-deleted edges are excluded.
    pub async fn find_edges_at(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        relationship_type: RelationshipType,
        on_date: NaiveDate,
    ) -> Result<Vec<company_relationship::Model>, InternalError> {
        CompanyRelationship::find()
            .filter(Column::CompanyFrom.eq(from))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .filter(Column::Deleted.eq(false))
            .filter(Column::StartDate.lte(on_date))
            .filter(
                Condition::any()
                    .add(Column::EndDate.is_null())
                    .add(Column::EndDate.gte(on_date)),
            )
            .order_by_desc(Column::IsPrimary)
            .order_by_desc(Column::StartDate)
            .order_by_desc(Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_edges_at", e))
    }

    async fn find_open_between(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        to: i64,
        relationship_type: RelationshipType,
    ) -> Result<Option<company_relationship::Model>, InternalError> {
        Self::open_edges()
            .filter(Column::CompanyFrom.eq(from))
            .filter(Column::CompanyTo.eq(to))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_open_between", e))
    }

    async fn find_open_primary(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        relationship_type: RelationshipType,
    ) -> Result<Option<company_relationship::Model>, InternalError> {
        Self::open_edges()
            .filter(Column::CompanyFrom.eq(from))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .filter(Column::IsPrimary.eq(true))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_open_primary", e))
    }

    /// Idempotent edge creation
    ///
    /// * an open edge for (from, to, type) is returned unchanged;
    /// * otherwise the most recent soft-deleted or closed edge is reopened
    ///   (`status=active`, `end_date=None`, `deleted=false`);
    /// * otherwise a new non-primary, active edge starting today is inserted.
    ///
    /// A unique violation while writing means another caller opened the
    /// same edge concurrently; the open edge is re-read and returned.
    ///
    /// # Errors
    /// * `RelationshipError::InvalidRelationship` - `from == to`
    pub async fn upsert_edge(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        to: i64,
        relationship_type: RelationshipType,
        created_by: Option<&str>,
    ) -> Result<company_relationship::Model, InternalError> {
        if from == to {
            return Err(RelationshipError::invalid(from, to, "an edge cannot point to itself").into());
        }

        if let Some(open) = self.find_open_between(conn, from, to, relationship_type).await? {
            tracing::debug!("Edge {} -> {} ({}) already open as #{}", from, to, relationship_type, open.id);
            return Ok(open);
        }

        let dormant = CompanyRelationship::find()
            .filter(Column::CompanyFrom.eq(from))
            .filter(Column::CompanyTo.eq(to))
            .filter(Column::RelationshipType.eq(relationship_type.as_str()))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_dormant_edge", e))?;

        let now = Utc::now();
        let write_result = match dormant {
            Some(edge) => {
                let edge_id = edge.id;
                // A reopened primary must not collide with a primary opened since.
                let keep_primary = edge.is_primary
                    && self.find_open_primary(conn, from, relationship_type).await?.is_none();

                let mut active_model: ActiveModel = edge.into();
                active_model.deleted = Set(false);
                active_model.status = Set(RelationshipStatus::Active.as_str().to_string());
                active_model.end_date = Set(None);
                active_model.is_primary = Set(keep_primary);
                active_model.updated_by = Set(created_by.map(str::to_string));
                active_model.updated_at = Set(now);

                let result = active_model.update(conn).await;
                if result.is_ok() {
                    tracing::info!("Reactivated edge #{} {} -> {} ({})", edge_id, from, to, relationship_type);
                }
                result
            }
            None => {
                let active_model = ActiveModel {
                    id: sea_orm::ActiveValue::NotSet,
                    company_from: Set(from),
                    company_to: Set(to),
                    relationship_type: Set(relationship_type.as_str().to_string()),
                    status: Set(RelationshipStatus::Active.as_str().to_string()),
                    is_primary: Set(false),
                    start_date: Set(now.date_naive()),
                    end_date: Set(None),
                    metadata: Set(None),
                    deleted: Set(false),
                    created_by: Set(created_by.map(str::to_string)),
                    updated_by: Set(created_by.map(str::to_string)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };

                let result = active_model.insert(conn).await;
                if let Ok(created) = &result {
                    tracing::info!("Created edge #{} {} -> {} ({})", created.id, from, to, relationship_type);
                }
                result
            }
        };

        match write_result {
            Ok(edge) => Ok(edge),
            Err(e) if is_unique_violation(&e) => {
                tracing::debug!(
                    "Concurrent create of edge {} -> {} ({}), returning existing edge",
                    from,
                    to,
                    relationship_type
                );
                self.find_open_between(conn, from, to, relationship_type)
                    .await?
                    .ok_or_else(|| {
                        RelationshipError::constraint(from, to, relationship_type.as_str(), e.to_string()).into()
                    })
            }
            Err(e) => Err(InternalError::database("upsert_edge", e)),
        }
    }

    /// Explicit provisioning of an edge with all attributes
    ///
    /// # Errors
    /// * `RelationshipError::InvalidRelationship` - `from == to` or `end_date < start_date`
    /// * `RelationshipError::ConstraintViolation` - a second open edge for
    ///   (from, to, type), or a second open primary edge for (from, type)
    pub async fn create_edge(
        &self,
        conn: &impl ConnectionTrait,
        new_edge: NewRelationship,
    ) -> Result<company_relationship::Model, InternalError> {
        let NewRelationship {
            company_from: from,
            company_to: to,
            relationship_type,
            ..
        } = new_edge;

        if from == to {
            return Err(RelationshipError::invalid(from, to, "an edge cannot point to itself").into());
        }
        if let Some(end_date) = new_edge.end_date {
            if end_date < new_edge.start_date {
                return Err(RelationshipError::invalid(from, to, "end date precedes start date").into());
            }
        }

        let opens = new_edge.end_date.is_none();
        if opens && self.find_open_between(conn, from, to, relationship_type).await?.is_some() {
            return Err(RelationshipError::constraint(from, to, relationship_type.as_str(), "open edge already exists").into());
        }
        if opens && new_edge.is_primary && self.find_open_primary(conn, from, relationship_type).await?.is_some() {
            return Err(
                RelationshipError::constraint(from, to, relationship_type.as_str(), "open primary edge already exists").into(),
            );
        }

        let now = Utc::now();
        let active_model = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            company_from: Set(from),
            company_to: Set(to),
            relationship_type: Set(relationship_type.as_str().to_string()),
            status: Set(new_edge.status.as_str().to_string()),
            is_primary: Set(new_edge.is_primary),
            start_date: Set(new_edge.start_date),
            end_date: Set(new_edge.end_date),
            metadata: Set(new_edge.metadata),
            deleted: Set(false),
            created_by: Set(new_edge.created_by.clone()),
            updated_by: Set(new_edge.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = active_model.insert(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                RelationshipError::constraint(from, to, relationship_type.as_str(), e.to_string()).into()
            } else {
                InternalError::database("create_edge", e)
            }
        })?;

        tracing::info!(
            "Provisioned edge #{} {} -> {} ({}, primary={})",
            created.id,
            from,
            to,
            relationship_type,
            created.is_primary
        );

        Ok(created)
    }

    /// Mark an open edge as the primary edge for its (from, type)
    ///
    /// # Errors
    /// * `RelationshipError::NotFound` - no edge with this id
    /// * `RelationshipError::InvalidRelationship` - the edge is closed or deleted
    /// * `RelationshipError::ConstraintViolation` - another open primary edge exists
    pub async fn set_primary(
        &self,
        conn: &impl ConnectionTrait,
        edge_id: i64,
    ) -> Result<company_relationship::Model, InternalError> {
        let edge = self
            .find_edge_by_id(conn, edge_id)
            .await?
            .ok_or(RelationshipError::NotFound { id: edge_id })?;

        if !edge.is_open() {
            return Err(RelationshipError::invalid(edge.company_from, edge.company_to, "only open edges can be primary").into());
        }
        if edge.is_primary {
            return Ok(edge);
        }

        let relationship_type: RelationshipType = edge.relationship_type.parse()?;
        if let Some(other) = self.find_open_primary(conn, edge.company_from, relationship_type).await? {
            return Err(RelationshipError::constraint(
                edge.company_from,
                edge.company_to,
                relationship_type.as_str(),
                format!("edge #{} is already primary", other.id),
            )
            .into());
        }

        let (from, to) = (edge.company_from, edge.company_to);
        let mut active_model: ActiveModel = edge.into();
        active_model.is_primary = Set(true);
        active_model.updated_at = Set(Utc::now());

        active_model.update(conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                RelationshipError::constraint(from, to, relationship_type.as_str(), e.to_string()).into()
            } else {
                InternalError::database("set_primary", e)
            }
        })
    }

    /// Soft-delete an edge (supersession). Edges are never physically removed.
    ///
    /// # Returns
    /// * `Ok(true)` - The edge was marked deleted
    /// * `Ok(false)` - No such edge, or it was already deleted
    pub async fn soft_delete_edge(
        &self,
        conn: &impl ConnectionTrait,
        edge_id: i64,
        deleted_by: Option<&str>,
    ) -> Result<bool, InternalError> {
        let Some(edge) = self.find_edge_by_id(conn, edge_id).await? else {
            return Ok(false);
        };
        if edge.deleted {
            return Ok(false);
        }

        let mut active_model: ActiveModel = edge.into();
        active_model.deleted = Set(true);
        active_model.status = Set(RelationshipStatus::Inactive.as_str().to_string());
        active_model.updated_by = Set(deleted_by.map(str::to_string));
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("soft_delete_edge", e))?;

        tracing::info!("Soft-deleted edge #{}", edge_id);

        Ok(true)
    }

    /// End an edge's validity window
    ///
    /// # Errors
    /// * `RelationshipError::NotFound` - no edge with this id
    /// * `RelationshipError::InvalidRelationship` - `end_date` precedes the start date
    pub async fn close_edge(
        &self,
        conn: &impl ConnectionTrait,
        edge_id: i64,
        end_date: NaiveDate,
    ) -> Result<company_relationship::Model, InternalError> {
        let edge = self
            .find_edge_by_id(conn, edge_id)
            .await?
            .ok_or(RelationshipError::NotFound { id: edge_id })?;

        if end_date < edge.start_date {
            return Err(RelationshipError::invalid(edge.company_from, edge.company_to, "end date precedes start date").into());
        }

        let mut active_model: ActiveModel = edge.into();
        active_model.end_date = Set(Some(end_date));
        active_model.status = Set(RelationshipStatus::Terminated.as_str().to_string());
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("close_edge", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_control_plane_db;
    use chrono::Duration;

    fn days_ago(days: i64) -> NaiveDate {
        Utc::now().date_naive() - Duration::days(days)
    }

    #[tokio::test]
    async fn test_upsert_edge_rejects_self_reference() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let result = store.upsert_edge(&db, 7, 7, RelationshipType::Affiliate, None).await;
        assert!(matches!(
            result,
            Err(InternalError::Relationship(RelationshipError::InvalidRelationship { .. }))
        ));
    }

    #[tokio::test]
    async fn test_upsert_edge_creates_non_primary_active_edge() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let edge = store
            .upsert_edge(&db, 300000, 100000, RelationshipType::Affiliate, Some("tester"))
            .await
            .unwrap();

        assert!(!edge.is_primary);
        assert_eq!(edge.status, "active");
        assert_eq!(edge.start_date, Utc::now().date_naive());
        assert!(edge.end_date.is_none());
        assert_eq!(edge.created_by.as_deref(), Some("tester"));
    }

    #[tokio::test]
    async fn test_upsert_edge_is_idempotent() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let first = store.upsert_edge(&db, 1, 2, RelationshipType::Affiliate, None).await.unwrap();
        let second = store.upsert_edge(&db, 1, 2, RelationshipType::Affiliate, None).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first, second);

        let all = CompanyRelationship::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_edge_reactivates_soft_deleted_edge() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let edge = store.upsert_edge(&db, 1, 2, RelationshipType::Affiliate, None).await.unwrap();
        assert!(store.soft_delete_edge(&db, edge.id, Some("tester")).await.unwrap());

        let revived = store.upsert_edge(&db, 1, 2, RelationshipType::Affiliate, None).await.unwrap();
        assert_eq!(revived.id, edge.id);
        assert!(!revived.deleted);
        assert_eq!(revived.status, "active");

        let all = CompanyRelationship::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_edge_reopens_closed_edge() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let edge = store
            .create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Partner).starting(days_ago(30)))
            .await
            .unwrap();
        store.close_edge(&db, edge.id, days_ago(1)).await.unwrap();

        let reopened = store.upsert_edge(&db, 1, 2, RelationshipType::Partner, None).await.unwrap();
        assert_eq!(reopened.id, edge.id);
        assert!(reopened.end_date.is_none());
        assert_eq!(reopened.status, "active");
    }

    #[tokio::test]
    async fn test_concurrent_upserts_yield_one_edge() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let (a, b) = tokio::join!(
            store.upsert_edge(&db, 10, 20, RelationshipType::Affiliate, None),
            store.upsert_edge(&db, 10, 20, RelationshipType::Affiliate, None),
        );

        assert_eq!(a.unwrap().id, b.unwrap().id);
        let all = CompanyRelationship::find().all(&db).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_find_open_edge_prefers_primary_then_recent() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(&db, NewRelationship::new(1, 10, RelationshipType::Affiliate).starting(days_ago(1)))
            .await
            .unwrap();
        let primary = store
            .create_edge(&db, NewRelationship::new(1, 11, RelationshipType::Affiliate).starting(days_ago(90)).primary())
            .await
            .unwrap();

        let found = store.find_open_edge(&db, 1, RelationshipType::Affiliate).await.unwrap().unwrap();
        assert_eq!(found.id, primary.id);

        // Without the primary, the most recent start date wins
        store.soft_delete_edge(&db, primary.id, None).await.unwrap();
        store
            .create_edge(&db, NewRelationship::new(1, 12, RelationshipType::Affiliate).starting(days_ago(10)))
            .await
            .unwrap();

        let found = store.find_open_edge(&db, 1, RelationshipType::Affiliate).await.unwrap().unwrap();
        assert_eq!(found.company_to, 10);
    }

    #[tokio::test]
    async fn test_find_open_edge_ignores_other_types_and_closed_edges() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Vendor))
            .await
            .unwrap();
        store
            .create_edge(
                &db,
                NewRelationship::new(1, 3, RelationshipType::Affiliate)
                    .starting(days_ago(20))
                    .ending(days_ago(5)),
            )
            .await
            .unwrap();

        let found = store.find_open_edge(&db, 1, RelationshipType::Affiliate).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_open_edge_by_target_uses_same_tie_break() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(&db, NewRelationship::new(5, 100, RelationshipType::Affiliate).starting(days_ago(3)))
            .await
            .unwrap();
        let primary = store
            .create_edge(&db, NewRelationship::new(6, 100, RelationshipType::Affiliate).starting(days_ago(50)).primary())
            .await
            .unwrap();

        let found = store.find_open_edge_by_target(&db, 100, RelationshipType::Affiliate).await.unwrap().unwrap();
        assert_eq!(found.id, primary.id);
        assert_eq!(found.company_from, 6);
    }

    #[tokio::test]
    async fn test_create_edge_rejects_second_open_primary() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Affiliate).primary())
            .await
            .unwrap();

        let result = store
            .create_edge(&db, NewRelationship::new(1, 3, RelationshipType::Affiliate).primary())
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Relationship(RelationshipError::ConstraintViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_edge_rejects_duplicate_open_edge() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store.create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Customer)).await.unwrap();
        let result = store.create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Customer)).await;

        assert!(matches!(
            result,
            Err(InternalError::Relationship(RelationshipError::ConstraintViolation { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_edge_rejects_inverted_window() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let result = store
            .create_edge(
                &db,
                NewRelationship::new(1, 2, RelationshipType::Affiliate)
                    .starting(days_ago(1))
                    .ending(days_ago(10)),
            )
            .await;
        assert!(matches!(
            result,
            Err(InternalError::Relationship(RelationshipError::InvalidRelationship { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unique_index_guards_open_primary_even_without_precheck() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Affiliate).primary())
            .await
            .unwrap();

        let now = Utc::now();
        let raw = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            company_from: Set(1),
            company_to: Set(3),
            relationship_type: Set("affiliate".to_string()),
            status: Set("active".to_string()),
            is_primary: Set(true),
            start_date: Set(now.date_naive()),
            end_date: Set(None),
            metadata: Set(None),
            deleted: Set(false),
            created_by: Set(None),
            updated_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let err = raw.insert(&db).await.unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[tokio::test]
    async fn test_set_primary_enforces_single_primary() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let a = store.create_edge(&db, NewRelationship::new(1, 2, RelationshipType::Affiliate)).await.unwrap();
        let b = store.create_edge(&db, NewRelationship::new(1, 3, RelationshipType::Affiliate)).await.unwrap();

        let promoted = store.set_primary(&db, a.id).await.unwrap();
        assert!(promoted.is_primary);

        let result = store.set_primary(&db, b.id).await;
        assert!(matches!(
            result,
            Err(InternalError::Relationship(RelationshipError::ConstraintViolation { .. }))
        ));

        let missing = store.set_primary(&db, 9999).await;
        assert!(matches!(
            missing,
            Err(InternalError::Relationship(RelationshipError::NotFound { id: 9999 }))
        ));
    }

    #[tokio::test]
    async fn test_find_edges_at_respects_validity_window() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        store
            .create_edge(
                &db,
                NewRelationship::new(1, 2, RelationshipType::Affiliate)
                    .starting(days_ago(100))
                    .ending(days_ago(50)),
            )
            .await
            .unwrap();
        store
            .create_edge(&db, NewRelationship::new(1, 3, RelationshipType::Affiliate).starting(days_ago(40)))
            .await
            .unwrap();

        let then = store.find_edges_at(&db, 1, RelationshipType::Affiliate, days_ago(60)).await.unwrap();
        assert_eq!(then.len(), 1);
        assert_eq!(then[0].company_to, 2);

        let now = store.find_edges_at(&db, 1, RelationshipType::Affiliate, days_ago(0)).await.unwrap();
        assert_eq!(now.len(), 1);
        assert_eq!(now[0].company_to, 3);

        let before_all = store.find_edges_at(&db, 1, RelationshipType::Affiliate, days_ago(200)).await.unwrap();
        assert!(before_all.is_empty());
    }

    #[tokio::test]
    async fn test_soft_delete_edge_is_not_repeatable() {
        let db = setup_control_plane_db().await;
        let store = RelationshipStore::new();

        let edge = store.upsert_edge(&db, 1, 2, RelationshipType::Affiliate, None).await.unwrap();
        assert!(store.soft_delete_edge(&db, edge.id, None).await.unwrap());
        assert!(!store.soft_delete_edge(&db, edge.id, None).await.unwrap());
        assert!(!store.soft_delete_edge(&db, 12345, None).await.unwrap());

        // Row is kept, only flagged
        let kept = store.find_edge_by_id(&db, edge.id).await.unwrap().unwrap();
        assert!(kept.deleted);
    }
}
