//! Prefix-length arithmetic
//!
//! Converts address-count requirements into prefix lengths. A block size
//! must be a power of two to be expressible as a prefix, so counts are
//! rounded up.

use crate::domain::error::{DomainError, DomainResult};

/// Addresses Azure reserves in every subnet (network, gateway, two DNS, broadcast).
pub const RESERVED_ADDRESSES_PER_SUBNET: u64 = 5;

const IPV4_SPACE: u64 = 1 << 32;

/// Smallest prefix length whose block holds at least `total_addresses`.
pub fn required_prefix_length(total_addresses: u64) -> DomainResult<u8> {
    if total_addresses == 0 {
        return Err(DomainError::InvalidSize(
            "address count must be a positive integer".into(),
        ));
    }
    let total = total_addresses
        .checked_next_power_of_two()
        .filter(|t| *t <= IPV4_SPACE)
        .ok_or_else(|| {
            DomainError::InvalidSize(format!(
                "{total_addresses} addresses do not fit in the IPv4 space"
            ))
        })?;
    // total = 2^(32 - prefix)
    Ok((32 - total.trailing_zeros()) as u8)
}

/// Prefix length for a subnet with `usable_hosts` after the standard reservation.
pub fn subnet_prefix_length_for_usable_hosts(usable_hosts: u64) -> DomainResult<u8> {
    prefix_length_for_usable_hosts(usable_hosts, RESERVED_ADDRESSES_PER_SUBNET)
}

/// Prefix length for a subnet with `usable_hosts` plus `reserved` infrastructure addresses.
pub fn prefix_length_for_usable_hosts(usable_hosts: u64, reserved: u64) -> DomainResult<u8> {
    if usable_hosts == 0 {
        return Err(DomainError::InvalidSize(
            "usable host count must be a positive integer".into(),
        ));
    }
    let total = usable_hosts.checked_add(reserved).ok_or_else(|| {
        DomainError::InvalidSize(format!("{usable_hosts} usable hosts is out of range"))
    })?;
    required_prefix_length(total)
}

/// Number of addresses in a block of the given prefix length.
pub fn address_count(prefix_len: u8) -> DomainResult<u64> {
    let prefix_len = validate_prefix_length(prefix_len)?;
    Ok(1u64 << (32 - u32::from(prefix_len)))
}

pub fn validate_prefix_length(prefix_len: u8) -> DomainResult<u8> {
    if prefix_len > 32 {
        return Err(DomainError::InvalidSize(format!(
            "prefix length /{prefix_len} exceeds /32"
        )));
    }
    Ok(prefix_len)
}
