// Database entities - SeaORM models
pub mod audit_log;
pub mod audit_log_detail;
pub mod company;
pub mod company_relationship;
pub mod user_mapping;
