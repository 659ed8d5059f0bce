use std::sync::Arc;

use clap::Parser;

use trakker_core::cli::{self, Cli, Commands};
use trakker_core::config::{init_logging, BootstrapSettings, DatabaseConnections};
use trakker_core::AppData;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging()?;

    let cli = Cli::parse();
    let settings = BootstrapSettings::from_env()?;
    tracing::debug!("Bootstrap settings: {:?}", settings);

    if let Commands::Migrate = cli.command {
        return cli::migrate::run_migrations(&settings).await;
    }

    let connections = DatabaseConnections::init(&settings).await?;
    let app_data = Arc::new(AppData::init(settings, connections));

    if let Err(e) = cli::execute_command(cli, &app_data).await {
        tracing::error!("Command failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    Ok(())
}
