use std::fmt;

use sea_orm::DatabaseConnection;

use crate::types::internal::SystemType;

/// Logical data partition an operation is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TenantScope {
    /// Shared partition used when no company is selected
    Default,
    Company { company_id: i64, system: SystemType },
}

impl TenantScope {
    pub fn company(company_id: i64, system: SystemType) -> Self {
        Self::Company { company_id, system }
    }

    pub fn company_id(&self) -> Option<i64> {
        match self {
            Self::Default => None,
            Self::Company { company_id, .. } => Some(*company_id),
        }
    }

    pub fn system(&self) -> Option<SystemType> {
        match self {
            Self::Default => None,
            Self::Company { system, .. } => Some(*system),
        }
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Company { company_id, system } => write!(f, "{}:{}", system, company_id),
        }
    }
}

/// Resolved tenant handle threaded through every tenant-scoped call.
///
/// Built per request by a [`crate::providers::TenantConnectionProvider`];
/// never stored in shared state.
#[derive(Clone)]
pub struct TenantContext {
    scope: TenantScope,
    conn: DatabaseConnection,
}

impl TenantContext {
    pub fn new(scope: TenantScope, conn: DatabaseConnection) -> Self {
        Self { scope, conn }
    }

    pub fn scope(&self) -> TenantScope {
        self.scope
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

impl fmt::Debug for TenantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TenantContext")
            .field("scope", &self.scope)
            .field("conn", &"<connection>")
            .finish()
    }
}
