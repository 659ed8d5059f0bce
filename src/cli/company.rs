use serde_json::{json, Map, Value};

use crate::app_data::AppData;
use crate::stores::NewCompany;
use crate::types::internal::{RequestContext, SystemType, TenantScope};

/// Register a company and audit it in the default partition
pub async fn add_company(
    app_data: &AppData,
    external_id: i64,
    system: SystemType,
    name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("company_add");
    let conn = &app_data.connections.control_plane;

    let company = app_data
        .company_store
        .register_company(
            conn,
            NewCompany {
                external_id,
                system,
                name: name.clone(),
            },
        )
        .await?;

    let mut state = Map::new();
    state.insert("external_id".to_string(), json!(company.external_id));
    state.insert("system".to_string(), json!(company.system));
    state.insert("name".to_string(), company.name.clone().map(Value::String).unwrap_or(Value::Null));
    state.insert("status".to_string(), json!(company.status));

    let tenant = app_data.tenant_provider.tenant(TenantScope::Default).await?;
    let label = company.name.clone().unwrap_or_else(|| format!("{}:{}", system, external_id));
    // Audit failures are already logged by the writer
    let _ = app_data
        .audit_logger
        .record_entity_create(&tenant, &ctx, "company", &company.id.to_string(), &label, &state)
        .await;

    println!("✅ Registered {}:{} (id {})", system, external_id, company.id);
    Ok(())
}

/// Soft-delete a company; edges pointing at it stop resolving
pub async fn remove_company(
    app_data: &AppData,
    external_id: i64,
    system: SystemType,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("company_remove");
    let conn = &app_data.connections.control_plane;

    let Some(company) = app_data.company_store.find_company(conn, external_id, system).await? else {
        println!("❌ No live company {}:{}", system, external_id);
        return Ok(());
    };

    app_data.company_store.soft_delete_company(conn, external_id, system).await?;

    let tenant = app_data.tenant_provider.tenant(TenantScope::Default).await?;
    let mut last_state = Map::new();
    last_state.insert("external_id".to_string(), json!(company.external_id));
    last_state.insert("system".to_string(), json!(company.system));
    let label = company.name.clone().unwrap_or_else(|| format!("{}:{}", system, external_id));
    let _ = app_data
        .audit_logger
        .record_entity_delete(&tenant, &ctx, "company", &company.id.to_string(), &label, &last_state)
        .await;

    println!("✅ Removed {}:{}", system, external_id);
    Ok(())
}
