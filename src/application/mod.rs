//! Application layer: services and use cases
//!
//! This layer turns user-facing sizing into prefix lengths and runs the
//! domain allocators. It never performs I/O.

pub mod error;
pub mod request;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use request::{PlanRequest, ResolvedSizing, SearchStrategy, SubnetSize, VnetSize};
