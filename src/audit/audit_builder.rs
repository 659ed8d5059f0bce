use serde::Serialize;
use serde_json::{json, Value};

use crate::audit::change_detection::redact;
use crate::audit::AuditLogger;
use crate::types::internal::{AuditAction, AuditEntry, AuditOutcome, AuditStatus, RequestContext, TenantContext, TenantScope};

/// Builder for audit entries
///
/// Provides a fluent API for constructing entries with type-safe field addition
/// and automatic sensitive data redaction.
///
/// # Example
/// ```ignore
/// let outcome = logger
///     .builder(AuditAction::Approve, "timesheet")
///     .with_context(&ctx)
///     .entity("42", "Week 12")
///     .add_field("approver_role", "manager")
///     .add_sensitive("token", "abc123")
///     .write(&logger, &tenant)
///     .await;
/// ```
#[derive(Debug, Clone)]
pub struct AuditBuilder {
    entry: AuditEntry,
}

impl AuditBuilder {
    pub fn new(action: impl Into<AuditAction>, entity_type: impl Into<String>) -> Self {
        Self {
            entry: AuditEntry::new(TenantScope::Default, action.into(), entity_type),
        }
    }

    /// Populate actor, client and tenant fields from RequestContext
    ///
    /// - `actor` -> `user_id`/`username`, display name into metadata
    /// - without an actor, `actor_id` goes into metadata
    /// - `request_id` and `source` are always kept
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.entry.scope = ctx.tenant_scope;
        self.entry.ip_address = ctx.ip_address.map(|ip| ip.to_string());
        self.entry.user_agent = ctx.user_agent.clone();
        self.entry.request_id = Some(ctx.request_id.to_string());

        match &ctx.actor {
            Some(actor) => {
                self.entry.user_id = Some(actor.user_id);
                self.entry.username = Some(actor.username.clone());
                if let Some(display_name) = &actor.display_name {
                    self.entry.metadata.insert("display_name".to_string(), json!(display_name));
                }
            }
            None => {
                self.entry.metadata.insert("actor_id".to_string(), json!(ctx.actor_id));
            }
        }
        self.entry.metadata.insert("source".to_string(), json!(ctx.source.as_str()));

        self
    }

    pub fn scope(mut self, scope: TenantScope) -> Self {
        self.entry.scope = scope;
        self
    }

    /// Identify the entity acted upon
    pub fn entity(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.entry.entity_id = Some(id.into());
        self.entry.entity_name = Some(name.into());
        self
    }

    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entry.entity_id = Some(id.into());
        self
    }

    /// Override the description otherwise derived from action and entity
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.entry.description = Some(description.into());
        self
    }

    pub fn request_data(mut self, data: impl Serialize) -> Self {
        self.entry.request_data = serde_json::to_value(data).ok();
        self
    }

    pub fn response_data(mut self, data: impl Serialize) -> Self {
        self.entry.response_data = serde_json::to_value(data).ok();
        self
    }

    pub fn status(mut self, status: AuditStatus) -> Self {
        self.entry.status = status;
        self
    }

    /// Mark the entry as an error with the given message
    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.entry.status = AuditStatus::Error;
        self.entry.error_message = Some(message.into());
        self
    }

    /// Add an arbitrary field to the entry's metadata
    ///
    /// Values that fail to serialize are skipped.
    pub fn add_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.metadata.insert(key.into(), json_value);
        }
        self
    }

    /// Add a metadata field with SHA-256 hashing
    ///
    /// Same input always produces the same hash, so entries can be correlated
    /// without revealing the original value.
    pub fn add_sensitive(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(&value) {
            let value_str = match json_value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.entry.metadata.insert(key.into(), json!(redact(&value_str)));
        }
        self
    }

    pub fn build(self) -> AuditEntry {
        self.entry
    }

    /// Write the entry through the logger into the tenant's partition
    pub async fn write(self, logger: &AuditLogger, tenant: &TenantContext) -> AuditOutcome {
        logger.record(tenant, self.build()).await
    }
}
