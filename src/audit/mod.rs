pub mod audit_builder;
pub mod audit_logger;
pub mod auth_events;
pub mod change_detection;
pub mod descriptions;
pub mod flatten;

pub use audit_builder::AuditBuilder;
pub use audit_logger::AuditLogger;
pub use change_detection::{diff, humanize, normalize};
pub use flatten::{flatten, pick_first};
