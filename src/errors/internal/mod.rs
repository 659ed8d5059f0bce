use thiserror::Error;

use crate::config::ApplicationError;

pub mod audit;
pub mod company;
pub mod database;
pub mod mapping;
pub mod relationship;

pub use audit::AuditError;
pub use company::CompanyError;
pub use database::{is_unique_violation, DatabaseError};
pub use mapping::MappingError;
pub use relationship::RelationshipError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors (store-specific).
/// "Not found" is never an error here: lookups return `Option`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error(transparent)]
    Config(#[from] ApplicationError),

    #[error(transparent)]
    Company(#[from] CompanyError),

    #[error(transparent)]
    Relationship(#[from] RelationshipError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation { operation: operation.to_string(), source })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }
}
