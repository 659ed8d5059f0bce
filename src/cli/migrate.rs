use crate::config::database::{connect, migrate_control_plane_database, migrate_tenant_database};
use crate::config::BootstrapSettings;

/// Run migrations on the control plane and the default tenant partition
///
/// Company partitions migrate themselves when first opened.
pub async fn run_migrations(settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let control_plane = connect(settings.control_plane_database_url(), "control_plane").await?;
    migrate_control_plane_database(&control_plane).await?;

    let default_tenant = connect(settings.default_tenant_database_url(), "default_tenant").await?;
    migrate_tenant_database(&default_tenant).await?;

    tracing::info!("All migrations completed successfully");
    println!("✅ Migrations completed");

    Ok(())
}
