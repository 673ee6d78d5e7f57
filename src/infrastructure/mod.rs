//! Infrastructure layer: collaborator implementations and DI container
//!
//! This layer implements the course store port and wires up services.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{InfraError, InfraResult};
