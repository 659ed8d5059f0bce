// Test utilities shared across unit tests
// Only compiled when running tests

use migration::{ControlPlaneMigrator, MigratorTrait, TenantAuditMigrator};
use sea_orm::{Database, DatabaseConnection};

use crate::stores::{CompanyStore, NewCompany};
use crate::types::db::company;
use crate::types::internal::SystemType;

/// Fresh in-memory control-plane database (companies, relationships, user mappings)
pub async fn setup_control_plane_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create control plane database");

    ControlPlaneMigrator::up(&db, None)
        .await
        .expect("Failed to run control plane migrations");

    db
}

/// Fresh in-memory tenant database holding only the audit tables
pub async fn setup_tenant_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create tenant database");

    TenantAuditMigrator::up(&db, None)
        .await
        .expect("Failed to run tenant audit migrations");

    db
}

/// Register a live company, panicking on failure
pub async fn seed_company(
    db: &DatabaseConnection,
    external_id: i64,
    system: SystemType,
    name: &str,
) -> company::Model {
    CompanyStore::new()
        .register_company(
            db,
            NewCompany {
                external_id,
                system,
                name: Some(name.to_string()),
            },
        )
        .await
        .expect("Failed to seed company")
}

/// Tenant URL template pointing at fresh files under the system temp dir
///
/// Each call yields a unique prefix so concurrently running tests never share
/// a partition.
pub fn temp_tenant_template() -> String {
    let dir = std::env::temp_dir();
    format!(
        "sqlite://{}/trakker_test_{}_{{system}}_{{company_id}}.db?mode=rwc",
        dir.display(),
        uuid::Uuid::new_v4().simple()
    )
}
