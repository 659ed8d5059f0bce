use serde::Serialize;

use crate::types::internal::SystemType;

/// The authenticated user performing an action.
///
/// `home_company` / `home_system` identify where the user's account lives;
/// when that system differs from the tenant being written to, the company id
/// has to be mapped through the identity resolver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub home_company: Option<i64>,
    pub home_system: Option<SystemType>,
}

impl Actor {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            display_name: None,
            home_company: None,
            home_system: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_home(mut self, company_id: i64, system: SystemType) -> Self {
        self.home_company = Some(company_id);
        self.home_system = Some(system);
        self
    }
}
