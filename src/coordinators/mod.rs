// Coordinators layer - Workflow orchestration
//
// Coordinators compose store, service and provider operations for one
// use case without holding business rules themselves.
pub mod mapping_coordinator;

pub use mapping_coordinator::MappingCoordinator;
