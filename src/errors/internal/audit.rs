use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to persist audit record: {operation} failed: {source}")]
    PersistenceFailure {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Failed to serialize audit data: {0}")]
    Serialization(String),
}

impl AuditError {
    pub fn persistence(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::PersistenceFailure {
            operation: operation.into(),
            source,
        }
    }
}
