use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelationshipError {
    /// Self-referential edge, inverted validity window, or an operation on an edge that cannot take it
    #[error("Invalid relationship {from} -> {to}: {reason}")]
    InvalidRelationship { from: i64, to: i64, reason: String },

    /// A uniqueness invariant would be broken (duplicate open edge or open primary edge)
    #[error("Relationship constraint violated for {from} -> {to} ({relationship_type}): {constraint}")]
    ConstraintViolation {
        from: i64,
        to: i64,
        relationship_type: String,
        constraint: String,
    },

    #[error("Relationship not found: {id}")]
    NotFound { id: i64 },
}

impl RelationshipError {
    pub fn invalid(from: i64, to: i64, reason: impl Into<String>) -> Self {
        Self::InvalidRelationship {
            from,
            to,
            reason: reason.into(),
        }
    }

    pub fn constraint(from: i64, to: i64, relationship_type: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            from,
            to,
            relationship_type: relationship_type.into(),
            constraint: constraint.into(),
        }
    }
}
