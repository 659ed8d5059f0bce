use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::TenantConnectionProvider;
use crate::services::IdentityResolver;
use crate::stores::UserMappingStore;
use crate::types::internal::{Actor, RelationshipType, SystemType, TenantContext, TenantScope};

/// Resolves which company a user acts as in another system
///
/// Order: same system short-circuit, then the per-user mapping cache, then a
/// graph walk whose answer is written back to the cache.
pub struct MappingCoordinator {
    identity_resolver: Arc<IdentityResolver>,
    user_mapping_store: Arc<UserMappingStore>,
    tenant_provider: Arc<dyn TenantConnectionProvider>,
    relationship_type: RelationshipType,
}

impl MappingCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            identity_resolver: app_data.identity_resolver.clone(),
            user_mapping_store: app_data.user_mapping_store.clone(),
            tenant_provider: app_data.tenant_provider.clone(),
            relationship_type: app_data.settings.default_relationship_type(),
        }
    }

    /// Company id `user` maps to in `target_system`, if any
    ///
    /// A failed cache write is logged and does not fail the resolution.
    pub async fn resolve_company_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user: &Actor,
        source_company: i64,
        source_system: SystemType,
        target_system: SystemType,
    ) -> Result<Option<i64>, InternalError> {
        if source_system == target_system {
            return Ok(Some(source_company));
        }

        if let Some(cached) = self
            .user_mapping_store
            .get_active_mapping(conn, user.user_id, &user.username, target_system)
            .await?
        {
            tracing::debug!("User {} maps to {}:{} (cached)", user.username, target_system, cached);
            return Ok(Some(cached));
        }

        let resolved = self
            .identity_resolver
            .resolve_mapped_id(conn, source_company, source_system, target_system, self.relationship_type)
            .await?;

        if let Some(mapped) = resolved {
            match self
                .user_mapping_store
                .upsert_user_mapping(conn, user.user_id, &user.username, source_company, mapped, target_system)
                .await
            {
                Ok(outcome) => {
                    tracing::debug!("Cached mapping for user {} -> {}:{} ({:?})", user.username, target_system, mapped, outcome)
                }
                Err(e) => tracing::warn!("Failed to cache mapping for user {}: {}", user.username, e),
            }
        }

        Ok(resolved)
    }

    /// Tenant handle for the company `user` maps to in `target_system`
    ///
    /// `None` when the user has no home company or no mapping exists.
    pub async fn tenant_for_user(
        &self,
        conn: &impl ConnectionTrait,
        user: &Actor,
        target_system: SystemType,
    ) -> Result<Option<TenantContext>, InternalError> {
        let (Some(home_company), Some(home_system)) = (user.home_company, user.home_system) else {
            return Ok(None);
        };

        let Some(company_id) = self
            .resolve_company_for_user(conn, user, home_company, home_system, target_system)
            .await?
        else {
            return Ok(None);
        };

        let tenant = self
            .tenant_provider
            .tenant(TenantScope::company(company_id, target_system))
            .await?;
        Ok(Some(tenant))
    }
}
