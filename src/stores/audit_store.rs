use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde_json::Value;

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_log::{self, Column, Entity as AuditLog};
use crate::types::db::audit_log_detail::{self, Entity as AuditLogDetail};
use crate::types::dto::{AuditFilter, AuditStats, AuditStatsQuery, CountBucket, DailyCount, Page, Pagination};
use crate::types::internal::{AuditEntry, AuditRecord, FieldChange};

const TOP_USERS: u64 = 10;
const DAILY_BUCKETS: u64 = 7;

/// Repository for the append-only audit trail
///
/// Works against whichever tenant connection it is handed; records never
/// leave the partition they were written to.
#[derive(Debug, Default)]
pub struct AuditStore {}

impl AuditStore {
    pub fn new() -> Self {
        Self {}
    }

    fn active_model(entry: &AuditEntry, description: String) -> audit_log::ActiveModel {
        let metadata = if entry.metadata.is_empty() {
            None
        } else {
            Some(Value::Object(entry.metadata.clone()))
        };

        audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            company_id: Set(entry.scope.company_id()),
            system: Set(entry.scope.system().map(|s| s.as_str().to_string())),
            user_id: Set(entry.user_id),
            username: Set(entry.username.clone()),
            action: Set(entry.action.as_str().to_string()),
            entity_type: Set(entry.entity_type.clone()),
            entity_id: Set(entry.entity_id.clone()),
            entity_name: Set(entry.entity_name.clone()),
            description: Set(description),
            ip_address: Set(entry.ip_address.clone()),
            user_agent: Set(entry.user_agent.clone()),
            request_id: Set(entry.request_id.clone()),
            request_data: Set(entry.request_data.clone()),
            response_data: Set(entry.response_data.clone()),
            status: Set(entry.status.as_str().to_string()),
            error_message: Set(entry.error_message.clone()),
            metadata: Set(metadata),
            created_at: Set(Utc::now()),
        }
    }

    fn description_of(entry: &AuditEntry) -> String {
        entry.description.clone().unwrap_or_else(|| {
            crate::audit::descriptions::describe(&entry.action, &entry.entity_type, entry.entity_name.as_deref())
        })
    }

    /// Write a single audit record without details
    pub async fn insert_record(
        &self,
        conn: &impl ConnectionTrait,
        entry: &AuditEntry,
    ) -> Result<AuditRecord, InternalError> {
        let record = Self::active_model(entry, Self::description_of(entry))
            .insert(conn)
            .await
            .map_err(|e| AuditError::persistence("insert_audit_log", e))?;

        Ok(AuditRecord {
            record,
            details: Vec::new(),
        })
    }

    /// Write a record and one detail row per change as a single transaction
    ///
    /// Either the parent and every detail row become visible, or nothing does.
    pub async fn record_with_changes<C>(
        &self,
        conn: &C,
        entry: &AuditEntry,
        changes: &[FieldChange],
    ) -> Result<AuditRecord, InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = conn
            .begin()
            .await
            .map_err(|e| AuditError::persistence("begin_transaction", e))?;

        match Self::write_in_transaction(&txn, entry, changes).await {
            Ok(record) => {
                txn.commit()
                    .await
                    .map_err(|e| AuditError::persistence("commit_transaction", e))?;
                Ok(record)
            }
            Err((operation, err)) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!("Rolling back audit transaction failed: {}", rollback_err);
                }
                Err(AuditError::persistence(operation, err).into())
            }
        }
    }

    async fn write_in_transaction(
        txn: &DatabaseTransaction,
        entry: &AuditEntry,
        changes: &[FieldChange],
    ) -> Result<AuditRecord, (&'static str, DbErr)> {
        let record = Self::active_model(entry, Self::description_of(entry))
            .insert(txn)
            .await
            .map_err(|e| ("insert_audit_log", e))?;

        let mut details = Vec::with_capacity(changes.len());
        for change in changes {
            let detail = audit_log_detail::ActiveModel {
                id: sea_orm::ActiveValue::NotSet,
                audit_log_id: Set(record.id),
                field_name: Set(change.field_name.clone()),
                field_label: Set(change.field_label.clone()),
                old_value: Set(change.old_value.clone()),
                new_value: Set(change.new_value.clone()),
                change_type: Set(change.change_type.as_str().to_string()),
                created_at: Set(record.created_at),
            }
            .insert(txn)
            .await
            .map_err(|e| ("insert_audit_log_detail", e))?;
            details.push(detail);
        }

        Ok(AuditRecord { record, details })
    }

    /// Load a record together with its details
    pub async fn find_record(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<AuditRecord>, InternalError> {
        let record = match AuditLog::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_audit_log", e))?
        {
            Some(record) => record,
            None => return Ok(None),
        };

        let details = record
            .find_related(AuditLogDetail)
            .order_by_asc(audit_log_detail::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_audit_log_details", e))?;

        Ok(Some(AuditRecord { record, details }))
    }

    fn filtered(filter: &AuditFilter) -> Select<AuditLog> {
        let mut condition = Condition::all();

        if let Some(company_id) = filter.company_id {
            condition = condition.add(Column::CompanyId.eq(company_id));
        }
        if let Some(system) = filter.system {
            condition = condition.add(Column::System.eq(system.as_str()));
        }
        if let Some(user_id) = filter.user_id {
            condition = condition.add(Column::UserId.eq(user_id));
        }
        if let Some(action) = &filter.action {
            condition = condition.add(Column::Action.eq(action.as_str()));
        }
        if let Some(entity_type) = &filter.entity_type {
            condition = condition.add(Column::EntityType.eq(entity_type.as_str()));
        }
        if let Some(entity_id) = &filter.entity_id {
            condition = condition.add(Column::EntityId.eq(entity_id.as_str()));
        }
        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.as_str()));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(Column::Description.contains(search))
                    .add(Column::EntityName.contains(search))
                    .add(Column::Username.contains(search)),
            );
        }
        if let Some(from) = filter.date_from {
            condition = condition.add(Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            condition = condition.add(Column::CreatedAt.lte(to));
        }

        AuditLog::find().filter(condition)
    }

    /// Page through records matching `filter`, newest first
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &AuditFilter,
        pagination: Pagination,
    ) -> Result<Page<audit_log::Model>, InternalError> {
        let pagination = pagination.normalized();

        let total = Self::filtered(filter)
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_audit_logs", e))?;

        let items = Self::filtered(filter)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .offset(pagination.offset())
            .limit(pagination.per_page)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_audit_logs", e))?;

        Ok(Page::new(items, total, pagination))
    }

    /// Aggregate counts for a dashboard view
    ///
    /// `daily` always holds seven buckets ending on the range end (or today).
    pub async fn stats(
        &self,
        conn: &impl ConnectionTrait,
        query: &AuditStatsQuery,
    ) -> Result<AuditStats, InternalError> {
        let filter = AuditFilter {
            company_id: query.company_id,
            date_from: query.date_from,
            date_to: query.date_to,
            ..Default::default()
        };

        let total = Self::filtered(&filter)
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_audit_logs", e))?;

        let by_action = Self::grouped_counts(conn, &filter, Column::Action, None).await?;
        let by_entity_type = Self::grouped_counts(conn, &filter, Column::EntityType, None).await?;
        let by_user = Self::grouped_counts(conn, &filter, Column::Username, Some(TOP_USERS)).await?;
        let by_status = Self::grouped_counts(conn, &filter, Column::Status, None).await?;

        let last_day = query.date_to.unwrap_or_else(Utc::now).date_naive();
        let daily = Self::daily_counts(conn, query.company_id, last_day).await?;

        Ok(AuditStats {
            total: total as i64,
            by_action,
            by_entity_type,
            by_user,
            by_status,
            daily,
        })
    }

    async fn grouped_counts(
        conn: &impl ConnectionTrait,
        filter: &AuditFilter,
        column: Column,
        limit: Option<u64>,
    ) -> Result<Vec<CountBucket>, InternalError> {
        let rows: Vec<(String, i64)> = Self::filtered(filter)
            .filter(column.is_not_null())
            .select_only()
            .column(column)
            .column_as(Column::Id.count(), "count")
            .group_by(column)
            .order_by_desc(Column::Id.count())
            .order_by_asc(column)
            .limit(limit)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("group_audit_logs", e))?;

        Ok(rows.into_iter().map(|(key, count)| CountBucket { key, count }).collect())
    }

    async fn daily_counts(
        conn: &impl ConnectionTrait,
        company_id: Option<i64>,
        last_day: NaiveDate,
    ) -> Result<Vec<DailyCount>, InternalError> {
        let first_day = last_day
            .checked_sub_days(Days::new(DAILY_BUCKETS - 1))
            .unwrap_or(last_day);
        let window_start = start_of(first_day);
        let window_end = last_day
            .checked_add_days(Days::new(1))
            .map(start_of)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut query = AuditLog::find()
            .filter(Column::CreatedAt.gte(window_start))
            .filter(Column::CreatedAt.lt(window_end));
        if let Some(company_id) = company_id {
            query = query.filter(Column::CompanyId.eq(company_id));
        }

        let timestamps: Vec<DateTime<Utc>> = query
            .select_only()
            .column(Column::CreatedAt)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| InternalError::database("daily_audit_logs", e))?;

        let mut daily: Vec<DailyCount> = first_day
            .iter_days()
            .take(DAILY_BUCKETS as usize)
            .map(|date| DailyCount { date, count: 0 })
            .collect();
        for created_at in timestamps {
            let day = created_at.date_naive();
            if let Some(bucket) = daily.iter_mut().find(|bucket| bucket.date == day) {
                bucket.count += 1;
            }
        }

        Ok(daily)
    }
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_tenant_db;
    use crate::types::internal::{AuditAction, AuditStatus, ChangeType, SystemType, TenantScope};
    use sea_orm::Statement;

    fn entry(action: AuditAction, entity_name: &str) -> AuditEntry {
        let mut entry = AuditEntry::new(TenantScope::company(10, SystemType::Tickettrakker), action, "ticket");
        entry.entity_id = Some("T-1".to_string());
        entry.entity_name = Some(entity_name.to_string());
        entry.user_id = Some(7);
        entry.username = Some("jdoe".to_string());
        entry
    }

    fn change(field: &str, old: Option<&str>, new: Option<&str>) -> FieldChange {
        FieldChange {
            field_name: field.to_string(),
            field_label: field.to_string(),
            old_value: old.map(str::to_string),
            new_value: new.map(str::to_string),
            change_type: ChangeType::Changed,
        }
    }

    #[tokio::test]
    async fn test_insert_record_fills_description_and_scope() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();

        let record = store.insert_record(&db, &entry(AuditAction::Create, "Printer jam")).await.unwrap();

        assert_eq!(record.record.description, "Created ticket: Printer jam");
        assert_eq!(record.record.company_id, Some(10));
        assert_eq!(record.record.system.as_deref(), Some("tickettrakker"));
        assert_eq!(record.record.status, "success");
        assert!(record.details.is_empty());
    }

    #[tokio::test]
    async fn test_record_with_changes_writes_parent_and_details() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        let changes = vec![change("title", Some("a"), Some("b")), change("priority", Some("low"), Some("high"))];

        let written = store
            .record_with_changes(&db, &entry(AuditAction::Update, "Printer jam"), &changes)
            .await
            .unwrap();
        assert_eq!(written.details.len(), 2);

        let loaded = store.find_record(&db, written.record.id).await.unwrap().unwrap();
        assert_eq!(loaded.details.len(), 2);
        assert_eq!(loaded.details[0].field_name, "title");
        assert_eq!(loaded.details[1].new_value.as_deref(), Some("high"));
    }

    #[tokio::test]
    async fn test_failed_detail_rolls_back_parent() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        // Second detail hits the (audit_log_id, field_name) unique index
        let changes = vec![change("title", Some("a"), Some("b")), change("title", Some("b"), Some("c"))];

        let result = store
            .record_with_changes(&db, &entry(AuditAction::Update, "Printer jam"), &changes)
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Audit(AuditError::PersistenceFailure { .. }))
        ));
        assert_eq!(AuditLog::find().count(&db).await.unwrap(), 0);
        assert_eq!(AuditLogDetail::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_record_missing_returns_none() {
        let db = setup_tenant_db().await;
        assert!(AuditStore::new().find_record(&db, 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleting_record_cascades_details() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        let written = store
            .record_with_changes(&db, &entry(AuditAction::Update, "x"), &[change("title", None, Some("b"))])
            .await
            .unwrap();

        db.execute(Statement::from_string(
            db.get_database_backend(),
            "PRAGMA foreign_keys = ON".to_string(),
        ))
        .await
        .unwrap();
        AuditLog::delete_by_id(written.record.id).exec(&db).await.unwrap();

        assert_eq!(AuditLogDetail::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_newest_first() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        store.insert_record(&db, &entry(AuditAction::Create, "Printer jam")).await.unwrap();
        store.insert_record(&db, &entry(AuditAction::Update, "Printer jam")).await.unwrap();
        let mut failed = entry(AuditAction::Delete, "Broken screen");
        failed.status = AuditStatus::Error;
        store.insert_record(&db, &failed).await.unwrap();

        let all = store.list(&db, &AuditFilter::default(), Pagination::default()).await.unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.items[0].action, "DELETE");
        assert_eq!(all.items[2].action, "CREATE");

        let search = AuditFilter {
            search: Some("printer".to_string()),
            ..Default::default()
        };
        assert_eq!(store.list(&db, &search, Pagination::default()).await.unwrap().total, 2);

        let errors = AuditFilter {
            status: Some(AuditStatus::Error),
            ..Default::default()
        };
        let page = store.list(&db, &errors, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].entity_name.as_deref(), Some("Broken screen"));
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        for i in 0..5 {
            store.insert_record(&db, &entry(AuditAction::View, &format!("t{}", i))).await.unwrap();
        }

        let page = store.list(&db, &AuditFilter::default(), Pagination::new(2, 2)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].entity_name.as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_stats_groups_counts() {
        let db = setup_tenant_db().await;
        let store = AuditStore::new();
        store.insert_record(&db, &entry(AuditAction::Create, "a")).await.unwrap();
        store.insert_record(&db, &entry(AuditAction::Update, "a")).await.unwrap();
        store.insert_record(&db, &entry(AuditAction::Update, "a")).await.unwrap();

        let stats = store.stats(&db, &AuditStatsQuery::default()).await.unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_action,
            vec![
                CountBucket { key: "UPDATE".to_string(), count: 2 },
                CountBucket { key: "CREATE".to_string(), count: 1 },
            ]
        );
        assert_eq!(stats.by_user, vec![CountBucket { key: "jdoe".to_string(), count: 3 }]);
        assert_eq!(stats.by_status[0].key, "success");
        assert_eq!(stats.daily.len(), 7);
        assert_eq!(stats.daily[6].date, Utc::now().date_naive());
        assert_eq!(stats.daily[6].count, 3);
    }
}
