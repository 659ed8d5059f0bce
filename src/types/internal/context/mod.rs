pub mod actor;
pub mod request_context;
pub mod request_id;
pub mod request_source;
pub mod tenant;

pub use {
    actor::Actor, request_context::RequestContext, request_id::RequestId,
    request_source::RequestSource, tenant::{TenantContext, TenantScope},
};
