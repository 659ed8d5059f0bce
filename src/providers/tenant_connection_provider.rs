use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tokio::sync::RwLock;

use crate::config::database::{connect, migrate_tenant_database};
use crate::config::bootstrap_settings::TENANT_DATABASE_URL_TEMPLATE;
use crate::config::{ApplicationError, BootstrapSettings, ConfigSpec};
use crate::errors::InternalError;
use crate::types::internal::{TenantContext, TenantScope};

/// Hands out the database handle for a tenant partition
///
/// Callers ask once per request and thread the returned [`TenantContext`]
/// through every tenant-scoped call.
#[async_trait]
pub trait TenantConnectionProvider: Send + Sync {
    async fn tenant(&self, scope: TenantScope) -> Result<TenantContext, InternalError>;
}

/// Pools kept open when no capacity is configured
pub const DEFAULT_POOL_CAPACITY: usize = 64;

struct CachedPool {
    conn: DatabaseConnection,
    last_used: AtomicU64,
}

/// Opens company partitions from a URL template such as
/// `sqlite://tenant_{system}_{company_id}.db?mode=rwc`
///
/// Pools are cached by scope only, so a handle is never shared between two
/// tenants. A partition's audit tables are migrated the first time it is opened.
/// At most `capacity` company pools stay cached; opening one more evicts the
/// least recently used. An evicted pool closes once the last request holding
/// its [`TenantContext`] drops it.
pub struct TemplateTenantProvider {
    default_tenant: DatabaseConnection,
    template: String,
    capacity: usize,
    clock: AtomicU64,
    pools: RwLock<HashMap<TenantScope, CachedPool>>,
}

impl TemplateTenantProvider {
    pub fn new(default_tenant: DatabaseConnection, template: impl Into<String>) -> Self {
        Self {
            default_tenant,
            template: template.into(),
            capacity: DEFAULT_POOL_CAPACITY,
            clock: AtomicU64::new(0),
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn from_settings(default_tenant: DatabaseConnection, settings: &BootstrapSettings) -> Self {
        Self::new(default_tenant, settings.tenant_database_url_template()).with_capacity(settings.tenant_pool_capacity())
    }

    /// Number of company pools currently cached
    pub async fn open_pools(&self) -> usize {
        self.pools.read().await.len()
    }

    fn url_for(&self, company_id: i64, system: &str) -> Result<String, InternalError> {
        ConfigSpec::validate_tenant_template(&self.template).map_err(|reason| ApplicationError::InvalidSetting {
            setting_name: TENANT_DATABASE_URL_TEMPLATE.to_string(),
            reason,
        })?;

        Ok(self
            .template
            .replace("{company_id}", &company_id.to_string())
            .replace("{system}", system))
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    async fn open(&self, scope: TenantScope) -> Result<DatabaseConnection, InternalError> {
        let (company_id, system) = match scope {
            TenantScope::Default => return Ok(self.default_tenant.clone()),
            TenantScope::Company { company_id, system } => (company_id, system),
        };

        if let Some(cached) = self.pools.read().await.get(&scope) {
            cached.last_used.store(self.tick(), Ordering::Relaxed);
            return Ok(cached.conn.clone());
        }

        let mut pools = self.pools.write().await;
        // Another request may have opened it while we waited for the lock
        if let Some(cached) = pools.get(&scope) {
            cached.last_used.store(self.tick(), Ordering::Relaxed);
            return Ok(cached.conn.clone());
        }

        let url = self.url_for(company_id, system.as_str())?;
        let conn = connect(&url, "tenant").await?;
        migrate_tenant_database(&conn).await?;
        tracing::info!("Opened tenant partition {}", scope);

        while pools.len() >= self.capacity {
            let Some(oldest) = pools
                .iter()
                .min_by_key(|(_, cached)| cached.last_used.load(Ordering::Relaxed))
                .map(|(scope, _)| *scope)
            else {
                break;
            };
            pools.remove(&oldest);
            tracing::debug!("Evicted tenant pool {} (capacity {})", oldest, self.capacity);
        }

        pools.insert(
            scope,
            CachedPool {
                conn: conn.clone(),
                last_used: AtomicU64::new(self.tick()),
            },
        );
        Ok(conn)
    }
}

#[async_trait]
impl TenantConnectionProvider for TemplateTenantProvider {
    async fn tenant(&self, scope: TenantScope) -> Result<TenantContext, InternalError> {
        let conn = self.open(scope).await?;
        Ok(TenantContext::new(scope, conn))
    }
}
