//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod planner;

pub use planner::PlannerService;
