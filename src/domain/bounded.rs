//! Allocation inside an explicit base range
//!
//! The VNet is searched for inside `base` only. When the requested size
//! cannot host both subnets, the VNet grows one prefix step at a time
//! until it reaches the size of `base`.

use tracing::{debug, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::packer::allocate_siblings;
use crate::domain::prefix::validate_prefix_length;
use crate::domain::range::overlaps_any;
use crate::domain::{Ipv4Range, Plan};

/// First sub-range of `base` at `prefix_len` that overlaps nothing in `used`.
pub fn first_free_range(
    base: &Ipv4Range,
    prefix_len: u8,
    used: &[Ipv4Range],
) -> DomainResult<Ipv4Range> {
    if prefix_len < base.prefix_len() {
        return Err(DomainError::NoCapacity(format!(
            "requested prefix /{prefix_len} is larger than base {base}"
        )));
    }
    base.subranges(prefix_len)?
        .find(|candidate| !overlaps_any(candidate, used))
        .ok_or_else(|| {
            DomainError::NoCapacity(format!(
                "no free /{prefix_len} networks inside {base} avoid the used ranges"
            ))
        })
}

/// Plan a VNet of at least `/vnet_prefix_len` inside `base`.
///
/// Tries the requested size first, then each larger size down to the
/// prefix length of `base`. At every size only the first free range is
/// considered.
pub fn plan_within_base(
    used: &[Ipv4Range],
    base: &Ipv4Range,
    vnet_prefix_len: u8,
    primary_len: u8,
    secondary_len: u8,
) -> DomainResult<Plan> {
    validate_prefix_length(vnet_prefix_len)?;
    validate_prefix_length(primary_len)?;
    validate_prefix_length(secondary_len)?;

    for prefix_len in (base.prefix_len()..=vnet_prefix_len).rev() {
        let network = match first_free_range(base, prefix_len, used) {
            Ok(network) => network,
            Err(e) => {
                trace!("plan_within_base: /{prefix_len}: {e}");
                continue;
            }
        };
        match allocate_siblings(&network, primary_len, secondary_len) {
            Ok((primary, secondary)) => {
                debug!("plan_within_base: found {network} at /{prefix_len}");
                return Ok(Plan::new(network, primary, secondary));
            }
            Err(e) if e.is_no_capacity() => {
                trace!("plan_within_base: {network} cannot host subnets: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    Err(DomainError::NoCapacity(format!(
        "unable to allocate /{primary_len} and /{secondary_len} subnets in any VNet size \
         from /{vnet_prefix_len} to /{} within {base}",
        base.prefix_len()
    )))
}
