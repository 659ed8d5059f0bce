use std::fmt;
use std::sync::Arc;

use crate::audit::change_detection::DEFAULT_SENSITIVE_FIELDS;
use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;
use crate::providers::tenant_connection_provider::DEFAULT_POOL_CAPACITY;
use crate::types::internal::RelationshipType;

pub const CONTROL_PLANE_DATABASE_URL: &str = "CONTROL_PLANE_DATABASE_URL";
pub const DEFAULT_TENANT_DATABASE_URL: &str = "DEFAULT_TENANT_DATABASE_URL";
pub const TENANT_DATABASE_URL_TEMPLATE: &str = "TENANT_DATABASE_URL_TEMPLATE";
pub const AUDIT_SENSITIVE_FIELDS: &str = "AUDIT_SENSITIVE_FIELDS";
pub const DEFAULT_RELATIONSHIP_TYPE: &str = "DEFAULT_RELATIONSHIP_TYPE";
pub const TENANT_POOL_CAPACITY: &str = "TENANT_POOL_CAPACITY";

/// Bootstrap settings for infrastructure configuration
pub struct BootstrapSettings {
    control_plane_database_url: String,
    default_tenant_database_url: String,
    tenant_database_url_template: String,
    audit_sensitive_fields: Vec<String>,
    default_relationship_type: RelationshipType,
    tenant_pool_capacity: usize,
}

impl BootstrapSettings {
    /// Load bootstrap settings from environment variables using ConfigSpec
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider + Send + Sync>) -> Result<Self, ApplicationError> {
        let control_plane_spec = ConfigSpec::new(env_provider.clone())
            .env_override(CONTROL_PLANE_DATABASE_URL)
            .default_value("sqlite://control_plane.db?mode=rwc")
            .min_length(1)
            .validator(ConfigSpec::validate_database_url);

        let default_tenant_spec = ConfigSpec::new(env_provider.clone())
            .env_override(DEFAULT_TENANT_DATABASE_URL)
            .default_value("sqlite://tenant_default.db?mode=rwc")
            .min_length(1)
            .validator(ConfigSpec::validate_database_url);

        let template_spec = ConfigSpec::new(env_provider.clone())
            .env_override(TENANT_DATABASE_URL_TEMPLATE)
            .default_value("sqlite://tenant_{system}_{company_id}.db?mode=rwc")
            .validator(ConfigSpec::validate_tenant_template);

        let sensitive_spec = ConfigSpec::new(env_provider.clone())
            .env_override(AUDIT_SENSITIVE_FIELDS)
            .default_value(&DEFAULT_SENSITIVE_FIELDS.join(","));

        let relationship_type_spec = ConfigSpec::new(env_provider.clone())
            .env_override(DEFAULT_RELATIONSHIP_TYPE)
            .default_value(RelationshipType::default().as_str());

        let pool_capacity_spec = ConfigSpec::new(env_provider.clone())
            .env_override(TENANT_POOL_CAPACITY)
            .default_value(&DEFAULT_POOL_CAPACITY.to_string())
            .validator(|value| match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(()),
                _ => Err("Value must be a positive number".to_string()),
            });

        let control_plane_database_url = control_plane_spec.load_setting_with_source()?.value;
        let default_tenant_database_url = default_tenant_spec.load_setting_with_source()?.value;
        let tenant_database_url_template = template_spec.load_setting_with_source()?.value;
        let audit_sensitive_fields = ConfigSpec::parse_list(&sensitive_spec.load_setting_with_source()?.value);

        let relationship_type_value = relationship_type_spec.load_setting_with_source()?.value;
        let default_relationship_type =
            ConfigSpec::parse_value::<RelationshipType>(&relationship_type_value, DEFAULT_RELATIONSHIP_TYPE)?;

        let tenant_pool_capacity =
            ConfigSpec::parse_value::<usize>(&pool_capacity_spec.load_setting_with_source()?.value, TENANT_POOL_CAPACITY)?;

        Ok(Self {
            control_plane_database_url,
            default_tenant_database_url,
            tenant_database_url_template,
            audit_sensitive_fields,
            default_relationship_type,
            tenant_pool_capacity,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn control_plane_database_url(&self) -> &str {
        &self.control_plane_database_url
    }

    pub fn default_tenant_database_url(&self) -> &str {
        &self.default_tenant_database_url
    }

    pub fn tenant_database_url_template(&self) -> &str {
        &self.tenant_database_url_template
    }

    pub fn audit_sensitive_fields(&self) -> &[String] {
        &self.audit_sensitive_fields
    }

    pub fn default_relationship_type(&self) -> RelationshipType {
        self.default_relationship_type
    }

    /// Upper bound on cached company pools
    pub fn tenant_pool_capacity(&self) -> usize {
        self.tenant_pool_capacity
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("control_plane_database_url", &self.control_plane_database_url)
            .field("default_tenant_database_url", &self.default_tenant_database_url)
            .field("tenant_database_url_template", &self.tenant_database_url_template)
            .field("audit_sensitive_fields", &self.audit_sensitive_fields)
            .field("default_relationship_type", &self.default_relationship_type)
            .field("tenant_pool_capacity", &self.tenant_pool_capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn load(env: MockEnvironment) -> Result<BootstrapSettings, ApplicationError> {
        BootstrapSettings::from_env_provider(Arc::new(env))
    }

    #[test]
    fn test_bootstrap_settings_with_defaults() {
        let settings = load(MockEnvironment::empty()).unwrap();

        assert_eq!(settings.control_plane_database_url(), "sqlite://control_plane.db?mode=rwc");
        assert_eq!(settings.default_tenant_database_url(), "sqlite://tenant_default.db?mode=rwc");
        assert_eq!(settings.default_relationship_type(), RelationshipType::Affiliate);
        assert_eq!(settings.tenant_pool_capacity(), DEFAULT_POOL_CAPACITY);
        assert_eq!(
            settings.audit_sensitive_fields(),
            &["password", "password_hash", "secret", "api_key", "token"]
        );
    }

    #[test]
    fn test_bootstrap_settings_from_env() {
        let settings = load(MockEnvironment::empty().with_vars(&[
            (CONTROL_PLANE_DATABASE_URL, "postgres://localhost/control"),
            (TENANT_DATABASE_URL_TEMPLATE, "postgres://localhost/t_{system}_{company_id}"),
            (AUDIT_SENSITIVE_FIELDS, "pin, ssn"),
            (DEFAULT_RELATIONSHIP_TYPE, "Vendor"),
        ]))
        .unwrap();

        assert_eq!(settings.control_plane_database_url(), "postgres://localhost/control");
        assert_eq!(settings.audit_sensitive_fields(), &["pin", "ssn"]);
        assert_eq!(settings.default_relationship_type(), RelationshipType::Vendor);
        assert_eq!(settings.tenant_database_url_template(), "postgres://localhost/t_{system}_{company_id}");
    }

    #[test]
    fn test_bootstrap_settings_empty_control_plane_url_fails_validation() {
        let result = load(MockEnvironment::empty().with_var(CONTROL_PLANE_DATABASE_URL, ""));

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, reason }) => {
                assert_eq!(setting_name, CONTROL_PLANE_DATABASE_URL);
                assert!(reason.contains("must be at least 1 characters long"));
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_bootstrap_settings_template_requires_company_placeholder() {
        let result = load(MockEnvironment::empty().with_var(TENANT_DATABASE_URL_TEMPLATE, "sqlite://tenant.db"));

        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_bootstrap_settings_template_requires_system_placeholder() {
        let result = load(
            MockEnvironment::empty().with_var(TENANT_DATABASE_URL_TEMPLATE, "sqlite://tenant_{company_id}.db?mode=rwc"),
        );

        match result {
            Err(ApplicationError::InvalidSetting { setting_name, reason }) => {
                assert_eq!(setting_name, TENANT_DATABASE_URL_TEMPLATE);
                assert!(reason.contains("{system}"));
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_bootstrap_settings_pool_capacity() {
        let settings = load(MockEnvironment::empty().with_var(TENANT_POOL_CAPACITY, "8")).unwrap();
        assert_eq!(settings.tenant_pool_capacity(), 8);

        let result = load(MockEnvironment::empty().with_var(TENANT_POOL_CAPACITY, "0"));
        assert!(matches!(result, Err(ApplicationError::InvalidSetting { .. })));
    }

    #[test]
    fn test_bootstrap_settings_unknown_relationship_type_fails_parse() {
        let result = load(MockEnvironment::empty().with_var(DEFAULT_RELATIONSHIP_TYPE, "sibling"));

        assert!(matches!(result, Err(ApplicationError::ParseError { .. })));
    }
}
