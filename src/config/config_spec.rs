use std::sync::Arc;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider + Send + Sync>,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load a setting value with source tracking
    ///
    /// The environment variable wins over the default. Both are validated.
    pub fn load_setting_with_source(&self) -> Result<ConfigValue, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;

                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable { name: env_var.clone() },
                });
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;

            return Ok(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            });
        }

        if self.required {
            return Err(ApplicationError::InvalidSetting {
                setting_name: self.setting_name().to_string(),
                reason: "Required setting has no value from any source".to_string(),
            });
        }

        Ok(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Default,
        })
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ApplicationError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ApplicationError::InvalidSetting {
                    setting_name: setting_name.to_string(),
                    reason: format!("Value must be at least {} characters long", min_len),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason,
            })?;
        }

        Ok(())
    }
}

/// Type parsing and validation utilities for configuration values
impl ConfigSpec {
    /// Split a comma separated list, dropping blanks
    ///
    /// `"password, token,,"` -> `["password", "token"]`
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Parse any `FromStr` value, reporting the setting name on failure
    pub fn parse_value<T>(value: &str, setting_name: &str) -> Result<T, ApplicationError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        value.trim().parse::<T>().map_err(|e| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("'{}': {}", value, e),
        })
    }

    /// Database URLs must name a scheme this build can connect to
    pub fn validate_database_url(value: &str) -> Result<(), String> {
        let supported = ["sqlite:", "postgres://", "postgresql://"];
        if supported.iter().any(|scheme| value.starts_with(scheme)) {
            Ok(())
        } else {
            Err(format!("Unsupported database URL '{}': expected sqlite or postgres", value))
        }
    }

    /// Tenant URL templates must contain both `{system}` and `{company_id}`
    ///
    /// Company ids are only unique within a system, so a template keyed on
    /// the id alone would hand two tenants the same database.
    pub fn validate_tenant_template(value: &str) -> Result<(), String> {
        Self::validate_database_url(value)?;
        for placeholder in ["{system}", "{company_id}"] {
            if !value.contains(placeholder) {
                return Err(format!("Template must contain the {} placeholder", placeholder));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn spec(env: MockEnvironment) -> ConfigSpec {
        ConfigSpec::new(Arc::new(env))
    }

    #[test]
    fn test_env_var_overrides_default() {
        let value = spec(MockEnvironment::empty().with_var("SOME_URL", "sqlite::memory:"))
            .env_override("SOME_URL")
            .default_value("sqlite://default.db")
            .load_setting_with_source()
            .unwrap();

        assert_eq!(value.value, "sqlite::memory:");
        assert_eq!(
            value.source,
            ConfigValueSource::EnvironmentVariable { name: "SOME_URL".to_string() }
        );
    }

    #[test]
    fn test_default_used_when_env_missing() {
        let value = spec(MockEnvironment::empty())
            .env_override("SOME_URL")
            .default_value("sqlite://default.db")
            .load_setting_with_source()
            .unwrap();

        assert_eq!(value.value, "sqlite://default.db");
        assert_eq!(value.source, ConfigValueSource::Default);
    }

    #[test]
    fn test_required_without_value_fails() {
        let result = spec(MockEnvironment::empty())
            .env_override("MISSING")
            .required(true)
            .load_setting_with_source();

        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_validator_runs_on_env_value() {
        let result = spec(MockEnvironment::empty().with_var("SOME_URL", "mysql://nope"))
            .env_override("SOME_URL")
            .validator(ConfigSpec::validate_database_url)
            .load_setting_with_source();

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, .. }) => assert_eq!(setting_name, "SOME_URL"),
            other => panic!("Expected InvalidSetting, got: {:?}", other.map(|v| v.value)),
        }
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(ConfigSpec::parse_list("password, token,,"), vec!["password", "token"]);
        assert!(ConfigSpec::parse_list(" ").is_empty());
    }

    #[test]
    fn test_validate_tenant_template() {
        assert!(ConfigSpec::validate_tenant_template("sqlite://tenant_{system}_{company_id}.db").is_ok());
        assert!(ConfigSpec::validate_tenant_template("sqlite://tenant.db").is_err());
        assert!(ConfigSpec::validate_tenant_template("sqlite://tenant_{company_id}.db").is_err());
        assert!(ConfigSpec::validate_tenant_template("sqlite://tenant_{system}.db").is_err());
    }
}
