//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, fetches used ranges and
//! wires up services.

pub mod di;
pub mod error;
pub mod inventory;
pub mod traits;

pub use error::{InfraError, InfraResult};
