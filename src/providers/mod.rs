// Providers layer - Work performers shared by coordinators
pub mod tenant_connection_provider;

pub use tenant_connection_provider::{TemplateTenantProvider, TenantConnectionProvider};
