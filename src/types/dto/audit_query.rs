use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::types::internal::{AuditAction, AuditStatus, SystemType};

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// Filters for listing audit records. Every field is optional and they combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub company_id: Option<i64>,
    pub system: Option<SystemType>,
    pub user_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub status: Option<AuditStatus>,
    /// Free text matched against description, entity name and username
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub per_page: u64,
}

impl Pagination {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self { page, per_page }
    }

    /// Clamp to page >= 1 and 1..=MAX_PER_PAGE rows
    pub fn normalized(self) -> Self {
        let per_page = if self.per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            self.per_page.min(MAX_PER_PAGE)
        };
        Self {
            page: self.page.max(1),
            per_page,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page.max(1) - 1) * self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let total_pages = if pagination.per_page == 0 {
            0
        } else {
            total.div_ceil(pagination.per_page)
        };
        Self {
            items,
            total,
            page: pagination.page,
            per_page: pagination.per_page,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditStatsQuery {
    pub company_id: Option<i64>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditStats {
    pub total: i64,
    pub by_action: Vec<CountBucket>,
    pub by_entity_type: Vec<CountBucket>,
    pub by_user: Vec<CountBucket>,
    pub by_status: Vec<CountBucket>,
    /// Oldest day first, always seven entries
    pub daily: Vec<DailyCount>,
}
