use crate::audit::AuditLogger;
use crate::types::internal::{AuditAction, AuditOutcome, RequestContext, TenantContext};

impl AuditLogger {
    /// Record a login or logout attempt
    ///
    /// # Arguments
    /// * `action` - `AuditAction::Login` or `AuditAction::Logout`
    /// * `username` - Username presented, also for failed attempts with no actor
    /// * `failure_reason` - `Some` marks the attempt as failed
    pub async fn record_auth(
        &self,
        tenant: &TenantContext,
        ctx: &RequestContext,
        action: AuditAction,
        username: &str,
        failure_reason: Option<&str>,
    ) -> AuditOutcome {
        let mut builder = self.builder(action, "user").with_context(ctx);
        if let Some(reason) = failure_reason {
            builder = builder.error_message(reason);
        }

        let mut entry = builder.build();
        if entry.username.is_none() {
            entry.username = Some(username.to_string());
        }
        entry.entity_name = Some(username.to_string());

        self.record(tenant, entry).await
    }

    /// Record an operation that failed, with status `error`
    pub async fn record_failure(
        &self,
        tenant: &TenantContext,
        ctx: &RequestContext,
        action: AuditAction,
        entity_type: &str,
        entity_id: Option<&str>,
        error_message: &str,
    ) -> AuditOutcome {
        let mut builder = self
            .builder(action, entity_type)
            .with_context(ctx)
            .error_message(error_message);
        if let Some(id) = entity_id {
            builder = builder.entity_id(id);
        }

        self.record(tenant, builder.build()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::stores::AuditStore;
    use crate::test::utils::setup_tenant_db;
    use crate::types::internal::TenantScope;

    #[tokio::test]
    async fn test_failed_login_records_username_and_error() {
        let tenant = TenantContext::new(TenantScope::Default, setup_tenant_db().await);
        let logger = AuditLogger::with_default_sensitive_fields(Arc::new(AuditStore::new()));
        let ctx = RequestContext::for_system("login");

        let record = logger
            .record_auth(&tenant, &ctx, AuditAction::Login, "mallory", Some("invalid password"))
            .await
            .into_result()
            .unwrap();

        assert_eq!(record.record.description, "User logged in");
        assert_eq!(record.record.username.as_deref(), Some("mallory"));
        assert_eq!(record.record.status, "error");
        assert_eq!(record.record.error_message.as_deref(), Some("invalid password"));
    }

    #[tokio::test]
    async fn test_record_failure_sets_error_status() {
        let tenant = TenantContext::new(TenantScope::Default, setup_tenant_db().await);
        let logger = AuditLogger::with_default_sensitive_fields(Arc::new(AuditStore::new()));
        let ctx = RequestContext::for_cli("import");

        let record = logger
            .record_failure(&tenant, &ctx, AuditAction::Import, "scorecard", Some("12"), "bad csv")
            .await
            .into_result()
            .unwrap();

        assert_eq!(record.record.status, "error");
        assert_eq!(record.record.entity_id.as_deref(), Some("12"));
        assert_eq!(record.record.description, "Imported scorecard");
    }
}
