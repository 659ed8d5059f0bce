// Errors layer - Error type definitions
pub mod internal;

pub use internal::InternalError;

#[cfg(test)]
mod internal_test;
