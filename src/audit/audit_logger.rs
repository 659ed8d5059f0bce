use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::audit::change_detection::{self, DEFAULT_SENSITIVE_FIELDS};
use crate::audit::AuditBuilder;
use crate::stores::audit_store::AuditStore;
use crate::types::internal::{AuditAction, AuditEntry, AuditOutcome, FieldChange, RequestContext, TenantContext};

/// Writes audit records into a tenant's own partition
///
/// Every operation returns an [`AuditOutcome`]. A failed write is logged here
/// and handed back as `Failed`; it never turns into an error for the business
/// operation that triggered it.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
    sensitive_fields: Vec<String>,
}

impl AuditLogger {
    /// # Arguments
    /// * `audit_store` - Store used for every write
    /// * `sensitive_fields` - Field names whose values are redacted and whose clearing is ignored
    pub fn new(audit_store: Arc<AuditStore>, sensitive_fields: Vec<String>) -> Self {
        Self {
            audit_store,
            sensitive_fields,
        }
    }

    pub fn with_default_sensitive_fields(audit_store: Arc<AuditStore>) -> Self {
        Self::new(
            audit_store,
            DEFAULT_SENSITIVE_FIELDS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn sensitive_fields(&self) -> Vec<&str> {
        self.sensitive_fields.iter().map(String::as_str).collect()
    }

    /// Create an AuditBuilder for custom entries
    pub fn builder(&self, action: impl Into<AuditAction>, entity_type: impl Into<String>) -> AuditBuilder {
        AuditBuilder::new(action, entity_type)
    }

    /// Diff two states with this logger's sensitive field list
    pub fn diff(
        &self,
        old_state: &Map<String, Value>,
        new_state: &Map<String, Value>,
        field_labels: &HashMap<String, String>,
    ) -> Vec<FieldChange> {
        change_detection::diff(old_state, new_state, field_labels, &self.sensitive_fields())
    }

    /// Write one record without field details
    pub async fn record(&self, tenant: &TenantContext, mut entry: AuditEntry) -> AuditOutcome {
        entry.scope = tenant.scope();
        let outcome: AuditOutcome = self.audit_store.insert_record(tenant.conn(), &entry).await.into();
        Self::report(&entry, &outcome);
        outcome
    }

    /// Write a record and its field changes atomically
    ///
    /// With no changes this is the same as [`Self::record`].
    pub async fn record_with_changes(
        &self,
        tenant: &TenantContext,
        mut entry: AuditEntry,
        changes: &[FieldChange],
    ) -> AuditOutcome {
        if changes.is_empty() {
            return self.record(tenant, entry).await;
        }

        entry.scope = tenant.scope();
        let outcome: AuditOutcome = self
            .audit_store
            .record_with_changes(tenant.conn(), &entry, changes)
            .await
            .into();
        Self::report(&entry, &outcome);
        outcome
    }

    fn report(entry: &AuditEntry, outcome: &AuditOutcome) {
        match outcome {
            AuditOutcome::Recorded(record) => {
                tracing::debug!(
                    "Audit record {} written: {} {} in {}",
                    record.record.id,
                    entry.action,
                    entry.entity_type,
                    entry.scope
                );
            }
            AuditOutcome::Failed(err) => {
                tracing::error!(
                    "Failed to write audit record ({} {} {:?}) in {}: {:?}",
                    entry.action,
                    entry.entity_type,
                    entry.entity_id,
                    entry.scope,
                    err
                );
            }
        }
    }

    /// Record creation of an entity; every non-empty field becomes an `added` detail
    pub async fn record_entity_create(
        &self,
        tenant: &TenantContext,
        ctx: &RequestContext,
        entity_type: &str,
        entity_id: &str,
        entity_name: &str,
        data: &Map<String, Value>,
    ) -> AuditOutcome {
        let changes = self.diff(&Map::new(), data, &HashMap::new());
        let entry = self
            .builder(AuditAction::Create, entity_type)
            .with_context(ctx)
            .entity(entity_id, entity_name)
            .response_data(data)
            .build();

        self.record_with_changes(tenant, entry, &changes).await
    }

    /// Record an update, with one detail row per changed field
    #[allow(clippy::too_many_arguments)]
    pub async fn record_entity_update(
        &self,
        tenant: &TenantContext,
        ctx: &RequestContext,
        entity_type: &str,
        entity_id: &str,
        entity_name: &str,
        old_state: &Map<String, Value>,
        new_state: &Map<String, Value>,
        field_labels: &HashMap<String, String>,
    ) -> AuditOutcome {
        let changes = self.diff(old_state, new_state, field_labels);
        let entry = self
            .builder(AuditAction::Update, entity_type)
            .with_context(ctx)
            .entity(entity_id, entity_name)
            .build();

        self.record_with_changes(tenant, entry, &changes).await
    }

    /// Record deletion; the last known state is kept as `removed` details
    pub async fn record_entity_delete(
        &self,
        tenant: &TenantContext,
        ctx: &RequestContext,
        entity_type: &str,
        entity_id: &str,
        entity_name: &str,
        last_state: &Map<String, Value>,
    ) -> AuditOutcome {
        let changes = self.diff(last_state, &Map::new(), &HashMap::new());
        let entry = self
            .builder(AuditAction::Delete, entity_type)
            .with_context(ctx)
            .entity(entity_id, entity_name)
            .build();

        self.record_with_changes(tenant, entry, &changes).await
    }
}
