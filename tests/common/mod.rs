// Common test utilities for integration tests
#![allow(dead_code)]

use migration::{ControlPlaneMigrator, MigratorTrait, TenantAuditMigrator};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{Map, Value};
use trakker_core::stores::{CompanyStore, NewCompany};
use trakker_core::types::internal::SystemType;

/// Creates a control plane database with migrations applied
pub async fn setup_control_plane_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create control plane database");

    ControlPlaneMigrator::up(&db, None)
        .await
        .expect("Failed to run control plane migrations");

    db
}

/// Creates a tenant partition with the audit tables
pub async fn setup_tenant_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create tenant database");

    TenantAuditMigrator::up(&db, None)
        .await
        .expect("Failed to run tenant audit migrations");

    db
}

pub async fn seed_company(db: &DatabaseConnection, external_id: i64, system: SystemType) {
    CompanyStore::new()
        .register_company(
            db,
            NewCompany {
                external_id,
                system,
                name: Some(format!("{}-{}", system, external_id)),
            },
        )
        .await
        .expect("Failed to seed company");
}

pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
