pub mod audit_query;

pub use audit_query::{AuditFilter, AuditStats, AuditStatsQuery, CountBucket, DailyCount, Page, Pagination};
