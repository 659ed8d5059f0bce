use crate::types::internal::AuditAction;

/// Human-readable description for an action on an entity
///
/// `"Created company: Acme"`; without a name the `": {name}"` suffix is left off.
/// Login/logout ignore the entity entirely.
pub fn describe(action: &AuditAction, entity_type: &str, entity_name: Option<&str>) -> String {
    let verb = match action {
        AuditAction::Login => return "User logged in".to_string(),
        AuditAction::Logout => return "User logged out".to_string(),
        AuditAction::Create => "Created",
        AuditAction::Update => "Updated",
        AuditAction::Delete => "Deleted",
        AuditAction::Evaluate => "Evaluated",
        AuditAction::Assign => "Assigned",
        AuditAction::Unassign => "Unassigned",
        AuditAction::Approve => "Approved",
        AuditAction::Reject => "Rejected",
        AuditAction::Submit => "Submitted",
        AuditAction::Export => "Exported",
        AuditAction::Import => "Imported",
        AuditAction::View => "Viewed",
        AuditAction::Custom(name) => name.as_str(),
    };

    match entity_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{} {}: {}", verb, entity_type, name),
        None => format!("{} {}", verb, entity_type),
    }
}
