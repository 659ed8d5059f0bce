pub mod audit;
pub mod change;
pub mod context;
pub mod relationship;
pub mod system;

pub use audit::{AuditAction, AuditEntry, AuditOutcome, AuditRecord, AuditStatus};
pub use change::{ChangeType, FieldChange};
pub use context::{Actor, RequestContext, RequestId, RequestSource, TenantContext, TenantScope};
pub use relationship::{NewRelationship, RelationshipStatus, RelationshipType};
pub use system::SystemType;
