use crate::app_data::AppData;
use crate::cli::TenantArgs;
use crate::types::dto::{AuditFilter, AuditStatsQuery, Pagination};
use crate::types::internal::{AuditAction, TenantScope};

pub struct ListArgs {
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub user_id: Option<i64>,
    pub search: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

fn scope_of(tenant: &TenantArgs) -> TenantScope {
    match (tenant.company_id, tenant.system) {
        (Some(company_id), Some(system)) => TenantScope::company(company_id, system),
        _ => TenantScope::Default,
    }
}

pub async fn list(app_data: &AppData, tenant: &TenantArgs, args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tenant = app_data.tenant_provider.tenant(scope_of(tenant)).await?;

    let filter = AuditFilter {
        user_id: args.user_id,
        action: args.action.as_deref().map(AuditAction::from),
        entity_type: args.entity_type,
        search: args.search,
        ..Default::default()
    };
    let page = app_data
        .audit_store
        .list(tenant.conn(), &filter, Pagination::new(args.page, args.per_page))
        .await?;

    println!(
        "Audit trail for {} (page {}/{}, {} records)",
        tenant.scope(),
        page.page,
        page.total_pages.max(1),
        page.total
    );
    for record in &page.items {
        println!(
            "#{:<6} {} {:<8} {:<10} {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M:%S"),
            record.action,
            record.status,
            record.description
        );
    }
    Ok(())
}

pub async fn stats(app_data: &AppData, tenant: &TenantArgs) -> Result<(), Box<dyn std::error::Error>> {
    let tenant = app_data.tenant_provider.tenant(scope_of(tenant)).await?;

    let stats = app_data
        .audit_store
        .stats(tenant.conn(), &AuditStatsQuery::default())
        .await?;

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
