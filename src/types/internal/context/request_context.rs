use std::net::IpAddr;

use super::{actor::Actor, request_id::RequestId, request_source::RequestSource, tenant::TenantScope};

/// Request context that flows through all layers
///
/// Carries who is acting, from where, and against which tenant. Supplied by
/// the calling application for every audit-worthy action.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Client user agent, if the caller reported one
    pub user_agent: Option<String>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API, CLI, or System)
    pub source: RequestSource,

    /// Authenticated user, `None` for CLI and system operations
    pub actor: Option<Actor>,

    /// Actor label used when there is no authenticated user
    pub actor_id: String,

    /// Tenant partition the request targets
    pub tenant_scope: TenantScope,
}

impl RequestContext {
    /// Create a RequestContext for an authenticated user
    pub fn for_user(actor: Actor, tenant_scope: TenantScope) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::new(),
            source: RequestSource::API,
            actor_id: actor.user_id.to_string(),
            actor: Some(actor),
            tenant_scope,
        }
    }

    /// Create a RequestContext for CLI operations
    ///
    /// # Arguments
    /// * `command_name` - Name of the CLI command being executed
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::new(),
            source: RequestSource::CLI,
            actor: None,
            actor_id: format!("cli:{}", command_name),
            tenant_scope: TenantScope::Default,
        }
    }

    /// Create a RequestContext for system operations
    ///
    /// # Arguments
    /// * `operation_name` - Name of the system operation being executed
    pub fn for_system(operation_name: &str) -> Self {
        Self {
            ip_address: None,
            user_agent: None,
            request_id: RequestId::new(),
            source: RequestSource::System,
            actor: None,
            actor_id: format!("system:{}", operation_name),
            tenant_scope: TenantScope::Default,
        }
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_tenant_scope(mut self, tenant_scope: TenantScope) -> Self {
        self.tenant_scope = tenant_scope;
        self
    }

    /// Label recorded as `created_by` / `updated_by` on control-plane rows
    pub fn actor_label(&self) -> String {
        match &self.actor {
            Some(actor) => actor.username.clone(),
            None => self.actor_id.clone(),
        }
    }
}
