use sea_orm::{Database, DatabaseConnection};
use migration::{ControlPlaneMigrator, MigratorTrait, TenantAuditMigrator};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Long-lived connections opened at startup
///
/// Company partitions are not here: they are opened on demand by the
/// tenant connection provider.
pub struct DatabaseConnections {
    pub control_plane: DatabaseConnection,
    pub default_tenant: DatabaseConnection,
}

impl DatabaseConnections {
    pub async fn init(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let control_plane = connect(bootstrap_settings.control_plane_database_url(), "control_plane").await?;
        let default_tenant = connect(bootstrap_settings.default_tenant_database_url(), "default_tenant").await?;

        Ok(Self {
            control_plane,
            default_tenant,
        })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_control_plane_database(&self.control_plane).await?;
        migrate_tenant_database(&self.default_tenant).await?;

        Ok(())
    }
}

/// Connect without running migrations
pub async fn connect(database_url: &str, label: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database(&format!("connect_{}_database", label), e))?;

    tracing::debug!("Connected to {} database: {}", label, database_url);

    Ok(db)
}

/// Run migrations for companies, relationships and user mappings
pub async fn migrate_control_plane_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    ControlPlaneMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_control_plane_migrations", e))?;

    tracing::debug!("Control plane migrations completed");

    Ok(())
}

/// Run the audit table migrations on one tenant partition
pub async fn migrate_tenant_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    TenantAuditMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_tenant_audit_migrations", e))?;

    tracing::debug!("Tenant audit migrations completed");

    Ok(())
}
