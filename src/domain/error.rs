//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Ipv4Range;

/// Domain errors represent planning failures.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Address or host count out of range, or a prefix length above 32.
    #[error("invalid size: {0}")]
    InvalidSize(String),

    /// Base range outside the recognized pools, or a VNet size the strategy cannot search.
    #[error("unsupported range: {0}")]
    UnsupportedRange(String),

    /// No non-overlapping placement for the requested sizes.
    #[error("no capacity: {0}")]
    NoCapacity(String),

    /// The whole search pool is already claimed by one used range.
    #[error(
        "pool exhausted: existing range {covering} covers all of {pool}; \
         choose a different private range (10.0.0.0/8 or 172.16.0.0/12) or use the base strategy"
    )]
    PoolExhausted { pool: Ipv4Range, covering: Ipv4Range },
}

impl DomainError {
    /// True for failures the allocators recover from by trying another candidate.
    pub fn is_no_capacity(&self) -> bool {
        matches!(self, DomainError::NoCapacity(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
