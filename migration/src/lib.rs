pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_companies;
mod m20250301_000002_create_company_relationships;
mod m20250301_000003_create_user_mappings;
mod m20250302_000001_create_audit_logs;

/// Migrations for the shared control-plane database
/// (companies, relationship edges, user mapping cache).
pub struct ControlPlaneMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ControlPlaneMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_companies::Migration),
            Box::new(m20250301_000002_create_company_relationships::Migration),
            Box::new(m20250301_000003_create_user_mappings::Migration),
        ]
    }
}

/// Migrations replicated into every tenant partition.
pub struct TenantAuditMigrator;

#[async_trait::async_trait]
impl MigratorTrait for TenantAuditMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250302_000001_create_audit_logs::Migration),
        ]
    }
}
