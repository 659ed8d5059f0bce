use crate::app_data::AppData;
use crate::types::internal::{AuditAction, RelationshipType, RequestContext, SystemType, TenantScope};

pub async fn create_mapping(
    app_data: &AppData,
    from: i64,
    from_system: SystemType,
    to: i64,
    to_system: SystemType,
    relationship_type: RelationshipType,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("mapping_create");
    let actor = ctx.actor_label();

    let edge = app_data
        .identity_resolver
        .create_mapping(
            &app_data.connections.control_plane,
            from,
            to,
            from_system,
            to_system,
            relationship_type,
            Some(&actor),
        )
        .await?;

    let tenant = app_data.tenant_provider.tenant(TenantScope::Default).await?;
    let _ = app_data
        .audit_logger
        .builder(AuditAction::Create, "company_relationship")
        .with_context(&ctx)
        .entity(
            edge.id.to_string(),
            format!("{}:{} -> {}:{}", from_system, from, to_system, to),
        )
        .response_data(&edge)
        .write(&app_data.audit_logger, &tenant)
        .await;

    println!(
        "✅ Edge #{} {}:{} -> {}:{} ({}, primary: {})",
        edge.id, from_system, from, to_system, to, relationship_type, edge.is_primary
    );
    Ok(())
}

pub async fn resolve(
    app_data: &AppData,
    id: i64,
    source_system: SystemType,
    target_system: SystemType,
    relationship_type: RelationshipType,
) -> Result<(), Box<dyn std::error::Error>> {
    let mapped = app_data
        .identity_resolver
        .resolve_mapped_id(
            &app_data.connections.control_plane,
            id,
            source_system,
            target_system,
            relationship_type,
        )
        .await?;

    match mapped {
        Some(mapped) => println!("{}:{} -> {}:{}", source_system, id, target_system, mapped),
        None => println!("No {} mapping for {}:{}", target_system, source_system, id),
    }
    Ok(())
}

pub async fn reverse(
    app_data: &AppData,
    id: i64,
    target_system: SystemType,
    source_system: SystemType,
    relationship_type: RelationshipType,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = app_data
        .identity_resolver
        .resolve_source_id(
            &app_data.connections.control_plane,
            id,
            target_system,
            source_system,
            relationship_type,
        )
        .await?;

    match source {
        Some(source) => println!("{}:{} <- {}:{}", target_system, id, source_system, source),
        None => println!("No {} company maps to {}:{}", source_system, target_system, id),
    }
    Ok(())
}
