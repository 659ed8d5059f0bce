/// Source of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSource {
    /// Request originated from an application endpoint
    API,

    /// Request originated from CLI command
    CLI,

    /// Request originated from system (automated operations)
    System,
}

impl RequestSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::API => "api",
            Self::CLI => "cli",
            Self::System => "system",
        }
    }
}
