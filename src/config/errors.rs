use std::fmt;

/// A setting read from the environment could not be used
///
/// `setting_name` is always the environment variable the value came from,
/// so the message tells the operator what to fix.
#[derive(Debug)]
pub enum ApplicationError {
    InvalidSetting { setting_name: String, reason: String },
    ParseError { setting_name: String, error: String },
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { setting_name, reason } => {
                write!(f, "Environment variable {} is not usable: {}", setting_name, reason)
            }
            Self::ParseError { setting_name, error } => {
                write!(f, "Environment variable {} has an unrecognised value: {}", setting_name, error)
            }
        }
    }
}

impl std::error::Error for ApplicationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_environment_variable() {
        let invalid = ApplicationError::InvalidSetting {
            setting_name: "TENANT_DATABASE_URL_TEMPLATE".to_string(),
            reason: "Template must contain the {system} placeholder".to_string(),
        };
        assert_eq!(
            invalid.to_string(),
            "Environment variable TENANT_DATABASE_URL_TEMPLATE is not usable: Template must contain the {system} placeholder"
        );

        let parse = ApplicationError::ParseError {
            setting_name: "DEFAULT_RELATIONSHIP_TYPE".to_string(),
            error: "unknown relationship type 'sibling'".to_string(),
        };
        assert!(parse.to_string().starts_with("Environment variable DEFAULT_RELATIONSHIP_TYPE has an unrecognised value"));
    }
}
