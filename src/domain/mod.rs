//! Domain layer: address ranges and allocation logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod bounded;
pub mod error;
pub mod packer;
pub mod plan;
pub mod prefix;
pub mod range;
pub mod rollover;

pub use bounded::{first_free_range, plan_within_base};
pub use error::{DomainError, DomainResult};
pub use packer::allocate_siblings;
pub use plan::Plan;
pub use prefix::{
    address_count, prefix_length_for_usable_hosts, required_prefix_length,
    subnet_prefix_length_for_usable_hosts, RESERVED_ADDRESSES_PER_SUBNET,
};
pub use range::{overlaps_any, Ipv4Range};
pub use rollover::{plan_with_rollover, rollover_candidates, Pool};
