//! ipplan: plan non-overlapping VNet and subnet CIDR ranges
//!
//! # Architecture
//!
//! - `domain`: address ranges, prefix arithmetic and the allocators (no I/O)
//! - `application`: sizing resolution and the planner service
//! - `infrastructure`: inventory sources, I/O traits, DI container
//! - `cli`: argument parsing, command dispatch, rendering
//! - `config`: layered settings

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
