//! Sibling subnet packing
//!
//! Places two child ranges inside a parent, lowest addresses first. The
//! larger child goes first so that alignment never strands it behind the
//! smaller one.

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::prefix::validate_prefix_length;
use crate::domain::Ipv4Range;

/// Allocate two non-overlapping children of `parent` at `len_a` and `len_b`.
///
/// Returns `(range_a, range_b)` in the caller's order. The same inputs
/// always produce the same pair.
pub fn allocate_siblings(
    parent: &Ipv4Range,
    len_a: u8,
    len_b: u8,
) -> DomainResult<(Ipv4Range, Ipv4Range)> {
    validate_prefix_length(len_a)?;
    validate_prefix_length(len_b)?;
    if len_a < parent.prefix_len() || len_b < parent.prefix_len() {
        return Err(DomainError::NoCapacity(format!(
            "subnets /{len_a} and /{len_b} do not fit inside {parent}"
        )));
    }

    // smaller prefix length = larger block
    let first_len = len_a.min(len_b);
    let second_len = len_a.max(len_b);

    let first = parent
        .subranges(first_len)?
        .next()
        .ok_or_else(|| unable(parent, len_a, len_b))?;
    let second = parent
        .subranges(second_len)?
        .find(|candidate| !candidate.overlaps(&first))
        .ok_or_else(|| unable(parent, len_a, len_b))?;

    if first_len == len_a {
        Ok((first, second))
    } else {
        Ok((second, first))
    }
}

fn unable(parent: &Ipv4Range, len_a: u8, len_b: u8) -> DomainError {
    DomainError::NoCapacity(format!(
        "unable to allocate two subnets (/{len_a} and /{len_b}) within {parent}"
    ))
}
