// Services layer - Business logic and orchestration
pub mod identity_resolver;

pub use identity_resolver::IdentityResolver;
