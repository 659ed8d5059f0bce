#[cfg(test)]
mod tests {
    use crate::errors::internal::{
        is_unique_violation, AuditError, CompanyError, InternalError, MappingError, RelationshipError,
    };
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_includes_operation() {
        let db_err = DbErr::RecordNotFound("test record".to_string());
        let error = InternalError::database("find_company", db_err);

        let error_string = error.to_string();
        assert!(error_string.contains("find_company"));
        assert!(error_string.contains("Database error"));
    }

    #[test]
    fn test_parse_error_includes_value_type() {
        let error = InternalError::parse("SystemType", "unknown system 'x'");

        let error_string = error.to_string();
        assert!(error_string.contains("SystemType"));
        assert!(error_string.contains("unknown system"));
        assert!(error_string.contains("Parse error"));
    }

    #[test]
    fn test_relationship_invalid_is_transparent() {
        let error: InternalError = RelationshipError::invalid(5, 5, "an edge cannot point to itself").into();
        assert_eq!(error.to_string(), "Invalid relationship 5 -> 5: an edge cannot point to itself");
    }

    #[test]
    fn test_relationship_constraint_violation_message() {
        let error = RelationshipError::constraint(1, 2, "affiliate", "open primary edge");
        assert_eq!(
            error.to_string(),
            "Relationship constraint violated for 1 -> 2 (affiliate): open primary edge"
        );
    }

    #[test]
    fn test_unknown_company_message() {
        let error = MappingError::UnknownCompany {
            company_id: 100000,
            system: "orgtrakker".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown company 100000 in orgtrakker");
    }

    #[test]
    fn test_duplicate_company_message() {
        let error = CompanyError::DuplicateCompany {
            external_id: 7,
            system: "skiltrakker".to_string(),
        };
        assert_eq!(error.to_string(), "Company 7 already exists in skiltrakker");
    }

    #[test]
    fn test_audit_persistence_failure_includes_operation() {
        let error = AuditError::persistence("insert_audit_detail", DbErr::Custom("boom".to_string()));
        let error_string = error.to_string();
        assert!(error_string.contains("insert_audit_detail"));
        assert!(error_string.contains("boom"));
    }

    #[test]
    fn test_unique_violation_detected_from_message() {
        let err = DbErr::Custom("UNIQUE constraint failed: companies.external_id".to_string());
        assert!(is_unique_violation(&err));

        let other = DbErr::Custom("connection reset".to_string());
        assert!(!is_unique_violation(&other));
    }
}
