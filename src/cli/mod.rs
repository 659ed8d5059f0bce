// CLI module for operator tasks against the control plane and tenant partitions

pub mod audit;
pub mod company;
pub mod mapping;
pub mod migrate;

use clap::{Args, Parser, Subcommand};

use crate::app_data::AppData;
use crate::types::internal::{RelationshipType, SystemType};

/// Trakker identity mapping and audit trail CLI
#[derive(Parser)]
#[command(name = "trakker")]
#[command(about = "Cross-system company mapping and audit trail tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run control plane and default tenant migrations
    Migrate,

    /// Tenant directory management
    #[command(subcommand)]
    Company(CompanyCommands),

    /// Cross-system company mappings
    #[command(subcommand)]
    Mapping(MappingCommands),

    /// Inspect a tenant's audit trail
    #[command(subcommand)]
    Audit(AuditCommands),
}

#[derive(Subcommand)]
pub enum CompanyCommands {
    /// Register a company
    Add {
        #[arg(long)]
        external_id: i64,
        #[arg(long)]
        system: SystemType,
        #[arg(long)]
        name: Option<String>,
    },

    /// Soft-delete a company
    Remove {
        #[arg(long)]
        external_id: i64,
        #[arg(long)]
        system: SystemType,
    },
}

#[derive(Subcommand)]
pub enum MappingCommands {
    /// Create (or reopen) a mapping edge between two live companies
    Create {
        #[arg(long)]
        from: i64,
        #[arg(long)]
        from_system: SystemType,
        #[arg(long)]
        to: i64,
        #[arg(long)]
        to_system: SystemType,
        /// Defaults to DEFAULT_RELATIONSHIP_TYPE
        #[arg(long = "type")]
        relationship_type: Option<RelationshipType>,
    },

    /// Map a source company to its counterpart in another system
    Resolve {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        source_system: SystemType,
        #[arg(long)]
        target_system: SystemType,
        #[arg(long = "type")]
        relationship_type: Option<RelationshipType>,
    },

    /// Reverse lookup: which source company maps to this id
    Reverse {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        target_system: SystemType,
        #[arg(long)]
        source_system: SystemType,
        #[arg(long = "type")]
        relationship_type: Option<RelationshipType>,
    },
}

/// Tenant partition selector; omit both for the default partition
#[derive(Args, Debug, Clone)]
pub struct TenantArgs {
    #[arg(long, requires = "system")]
    pub company_id: Option<i64>,
    #[arg(long, requires = "company_id")]
    pub system: Option<SystemType>,
}

#[derive(Subcommand)]
pub enum AuditCommands {
    /// List audit records, newest first
    List {
        #[command(flatten)]
        tenant: TenantArgs,
        #[arg(long)]
        action: Option<String>,
        #[arg(long)]
        entity_type: Option<String>,
        #[arg(long)]
        user_id: Option<i64>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 20)]
        per_page: u64,
    },

    /// Aggregated counts and the last seven days
    Stats {
        #[command(flatten)]
        tenant: TenantArgs,
    },
}

/// Execute CLI command
///
/// `main` runs `migrate` before building AppData, since the other commands
/// expect migrated databases.
pub async fn execute_command(cli: Cli, app_data: &AppData) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => {
            migrate::run_migrations(&app_data.settings).await?;
        }
        Commands::Company(CompanyCommands::Add {
            external_id,
            system,
            name,
        }) => {
            company::add_company(app_data, external_id, system, name).await?;
        }
        Commands::Company(CompanyCommands::Remove { external_id, system }) => {
            company::remove_company(app_data, external_id, system).await?;
        }
        Commands::Mapping(MappingCommands::Create {
            from,
            from_system,
            to,
            to_system,
            relationship_type,
        }) => {
            let relationship_type = relationship_type.unwrap_or(app_data.settings.default_relationship_type());
            mapping::create_mapping(app_data, from, from_system, to, to_system, relationship_type).await?;
        }
        Commands::Mapping(MappingCommands::Resolve {
            id,
            source_system,
            target_system,
            relationship_type,
        }) => {
            let relationship_type = relationship_type.unwrap_or(app_data.settings.default_relationship_type());
            mapping::resolve(app_data, id, source_system, target_system, relationship_type).await?;
        }
        Commands::Mapping(MappingCommands::Reverse {
            id,
            target_system,
            source_system,
            relationship_type,
        }) => {
            let relationship_type = relationship_type.unwrap_or(app_data.settings.default_relationship_type());
            mapping::reverse(app_data, id, target_system, source_system, relationship_type).await?;
        }
        Commands::Audit(AuditCommands::List {
            tenant,
            action,
            entity_type,
            user_id,
            search,
            page,
            per_page,
        }) => {
            let filter = audit::ListArgs {
                action,
                entity_type,
                user_id,
                search,
                page,
                per_page,
            };
            audit::list(app_data, &tenant, filter).await?;
        }
        Commands::Audit(AuditCommands::Stats { tenant }) => {
            audit::stats(app_data, &tenant).await?;
        }
    }

    Ok(())
}
