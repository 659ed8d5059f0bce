use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::InternalError;
use crate::types::db::{audit_log, audit_log_detail};
use crate::types::internal::context::TenantScope;

/// Action recorded in an audit entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    Evaluate,
    Assign,
    Unassign,
    Approve,
    Reject,
    Submit,
    Export,
    Import,
    View,
    Custom(String),
}

impl AuditAction {
    /// Convert AuditAction to string representation for database storage
    pub fn as_str(&self) -> &str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Evaluate => "EVALUATE",
            Self::Assign => "ASSIGN",
            Self::Unassign => "UNASSIGN",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::Submit => "SUBMIT",
            Self::Export => "EXPORT",
            Self::Import => "IMPORT",
            Self::View => "VIEW",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for AuditAction {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATE" => Self::Create,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "LOGIN" => Self::Login,
            "LOGOUT" => Self::Logout,
            "EVALUATE" => Self::Evaluate,
            "ASSIGN" => Self::Assign,
            "UNASSIGN" => Self::Unassign,
            "APPROVE" => Self::Approve,
            "REJECT" => Self::Reject,
            "SUBMIT" => Self::Submit,
            "EXPORT" => Self::Export,
            "IMPORT" => Self::Import,
            "VIEW" => Self::View,
            other => Self::Custom(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditStatus {
    #[default]
    Success,
    Error,
    Warning,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entry ready to be persisted
///
/// Built with [`crate::audit::AuditBuilder`]; `description` is filled from the
/// action/entity lookup table when left empty.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub scope: TenantScope,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub entity_name: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub request_data: Option<Value>,
    pub response_data: Option<Value>,
    pub status: AuditStatus,
    pub error_message: Option<String>,
    pub metadata: Map<String, Value>,
}

impl AuditEntry {
    pub fn new(scope: TenantScope, action: AuditAction, entity_type: impl Into<String>) -> Self {
        Self {
            scope,
            action,
            entity_type: entity_type.into(),
            entity_id: None,
            entity_name: None,
            description: None,
            user_id: None,
            username: None,
            ip_address: None,
            user_agent: None,
            request_id: None,
            request_data: None,
            response_data: None,
            status: AuditStatus::Success,
            error_message: None,
            metadata: Map::new(),
        }
    }
}

/// A persisted audit record with its field-level details
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    #[serde(flatten)]
    pub record: audit_log::Model,
    pub details: Vec<audit_log_detail::Model>,
}

/// Result of an audit write.
///
/// Audit failures never abort the operation that triggered them, so writers
/// hand back this value instead of a `Result` that could be `?`-propagated.
/// The failure has already been logged when `Failed` is returned.
#[derive(Debug)]
pub enum AuditOutcome {
    Recorded(AuditRecord),
    Failed(InternalError),
}

impl AuditOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded(_))
    }

    pub fn record(&self) -> Option<&AuditRecord> {
        match self {
            Self::Recorded(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&InternalError> {
        match self {
            Self::Recorded(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<AuditRecord, InternalError> {
        match self {
            Self::Recorded(record) => Ok(record),
            Self::Failed(err) => Err(err),
        }
    }
}

impl From<Result<AuditRecord, InternalError>> for AuditOutcome {
    fn from(result: Result<AuditRecord, InternalError>) -> Self {
        match result {
            Ok(record) => Self::Recorded(record),
            Err(err) => Self::Failed(err),
        }
    }
}
