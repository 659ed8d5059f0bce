// Stores layer - Data access and repository pattern
pub mod audit_store;
pub mod company_store;
pub mod relationship_store;
pub mod user_mapping_store;

pub use audit_store::AuditStore;
pub use company_store::{CompanyStore, NewCompany};
pub use relationship_store::RelationshipStore;
pub use user_mapping_store::{UpsertOutcome, UserMappingStore};
