use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::errors::internal::MappingError;
use crate::errors::InternalError;
use crate::stores::{CompanyStore, RelationshipStore};
use crate::types::db::company_relationship;
use crate::types::internal::{RelationshipType, SystemType};

/// Cross-system identity resolution over the relationship graph
///
/// Resolution is read-only: it never creates edges. An edge whose far end is
/// not a live company in the expected system is treated as orphaned and
/// resolves to `None`.
pub struct IdentityResolver {
    company_store: Arc<CompanyStore>,
    relationship_store: Arc<RelationshipStore>,
}

impl IdentityResolver {
    pub fn new(company_store: Arc<CompanyStore>, relationship_store: Arc<RelationshipStore>) -> Self {
        Self {
            company_store,
            relationship_store,
        }
    }

    /// Map `source_id` in `source_system` to its counterpart in `target_system`
    ///
    /// Follows the best open edge leaving `source_id` (primary first, then
    /// most recent start date).
    pub async fn resolve_mapped_id(
        &self,
        conn: &impl ConnectionTrait,
        source_id: i64,
        source_system: SystemType,
        target_system: SystemType,
        relationship_type: RelationshipType,
    ) -> Result<Option<i64>, InternalError> {
        let edge = match self
            .relationship_store
            .find_open_edge(conn, source_id, relationship_type)
            .await?
        {
            Some(edge) => edge,
            None => {
                tracing::debug!(
                    "No open {} edge from {}:{}",
                    relationship_type,
                    source_system,
                    source_id
                );
                return Ok(None);
            }
        };

        if !self.company_store.is_live(conn, edge.company_to, target_system).await? {
            tracing::warn!(
                "Orphaned edge #{}: {}:{} -> {} is not a live {} company",
                edge.id,
                source_system,
                source_id,
                edge.company_to,
                target_system
            );
            return Ok(None);
        }

        tracing::debug!(
            "Resolved {}:{} -> {}:{} via edge #{}",
            source_system,
            source_id,
            target_system,
            edge.company_to,
            edge.id
        );
        Ok(Some(edge.company_to))
    }

    /// Reverse walk: find the `source_system` company whose edge points at `mapped_id`
    pub async fn resolve_source_id(
        &self,
        conn: &impl ConnectionTrait,
        mapped_id: i64,
        target_system: SystemType,
        source_system: SystemType,
        relationship_type: RelationshipType,
    ) -> Result<Option<i64>, InternalError> {
        let edge = match self
            .relationship_store
            .find_open_edge_by_target(conn, mapped_id, relationship_type)
            .await?
        {
            Some(edge) => edge,
            None => return Ok(None),
        };

        if !self.company_store.is_live(conn, edge.company_from, source_system).await? {
            tracing::warn!(
                "Orphaned edge #{}: {} -> {}:{} does not start at a live {} company",
                edge.id,
                edge.company_from,
                target_system,
                mapped_id,
                source_system
            );
            return Ok(None);
        }

        Ok(Some(edge.company_from))
    }

    /// Create (or reopen) the edge `from -> to` after checking both companies are live
    ///
    /// # Errors
    /// * `MappingError::UnknownCompany` - Either endpoint is not a live company in its system
    /// * `RelationshipError::InvalidRelationship` - `from == to`
    #[allow(clippy::too_many_arguments)]
    pub async fn create_mapping(
        &self,
        conn: &impl ConnectionTrait,
        from: i64,
        to: i64,
        from_system: SystemType,
        to_system: SystemType,
        relationship_type: RelationshipType,
        created_by: Option<&str>,
    ) -> Result<company_relationship::Model, InternalError> {
        for (company_id, system) in [(from, from_system), (to, to_system)] {
            if !self.company_store.is_live(conn, company_id, system).await? {
                return Err(MappingError::UnknownCompany {
                    company_id,
                    system: system.to_string(),
                }
                .into());
            }
        }

        self.relationship_store
            .upsert_edge(conn, from, to, relationship_type, created_by)
            .await
    }
}
