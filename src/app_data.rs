use std::sync::Arc;

use crate::audit::AuditLogger;
use crate::config::database::DatabaseConnections;
use crate::config::BootstrapSettings;
use crate::providers::{TemplateTenantProvider, TenantConnectionProvider};
use crate::services::IdentityResolver;
use crate::stores::{AuditStore, CompanyStore, RelationshipStore, UserMappingStore};

/// Centralized application data following the main-owned stores pattern
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(settings, connections)
///   ↓ creates once
///   ├─ stores (company, relationship, user mapping, audit)
///   ├─ identity_resolver
///   ├─ audit_logger
///   └─ tenant_provider
///   ↓ wrapped in Arc<AppData>
///   └─ MappingCoordinator::new(app_data)
/// ```
pub struct AppData {
    pub connections: DatabaseConnections,
    pub settings: BootstrapSettings,
    pub company_store: Arc<CompanyStore>,
    pub relationship_store: Arc<RelationshipStore>,
    pub user_mapping_store: Arc<UserMappingStore>,
    pub audit_store: Arc<AuditStore>,
    pub identity_resolver: Arc<IdentityResolver>,
    pub audit_logger: Arc<AuditLogger>,
    pub tenant_provider: Arc<dyn TenantConnectionProvider>,
}

impl AppData {
    /// Database connections should be initialized and migrated before calling this.
    pub fn init(settings: BootstrapSettings, connections: DatabaseConnections) -> Self {
        tracing::info!("Initializing AppData...");

        let company_store = Arc::new(CompanyStore::new());
        let relationship_store = Arc::new(RelationshipStore::new());
        let user_mapping_store = Arc::new(UserMappingStore::new());
        let audit_store = Arc::new(AuditStore::new());
        tracing::debug!("Stores created");

        let identity_resolver = Arc::new(IdentityResolver::new(
            company_store.clone(),
            relationship_store.clone(),
        ));
        let audit_logger = Arc::new(AuditLogger::new(
            audit_store.clone(),
            settings.audit_sensitive_fields().to_vec(),
        ));
        let tenant_provider: Arc<dyn TenantConnectionProvider> = Arc::new(TemplateTenantProvider::from_settings(
            connections.default_tenant.clone(),
            &settings,
        ));

        tracing::info!("AppData initialization complete");

        Self {
            connections,
            settings,
            company_store,
            relationship_store,
            user_mapping_store,
            audit_store,
            identity_resolver,
            audit_logger,
            tenant_provider,
        }
    }
}
