//! Octet-rollover search across a private address pool
//!
//! Candidates are walked as /24 blocks `<a>.<second>.<third>.0/24`,
//! third octet first, rolling over into the next second octet until the
//! pool ends. Smaller VNets are carved out of each block in address order.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

use ipnet::Ipv4Net;
use tracing::{debug, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::packer::allocate_siblings;
use crate::domain::prefix::validate_prefix_length;
use crate::domain::range::overlaps_any;
use crate::domain::{Ipv4Range, Plan};

/// Prefix length of the blocks the grid is made of.
pub const BLOCK_PREFIX_LEN: u8 = 24;

/// A private address pool eligible for rollover search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    /// 10.0.0.0/8, second octets 0..=255
    TenSlash8,
    /// 172.16.0.0/12, second octets 16..=31
    OneSevenTwoSixteenSlash12,
}

impl Pool {
    pub const ALL: [Pool; 2] = [Pool::TenSlash8, Pool::OneSevenTwoSixteenSlash12];

    pub fn range(&self) -> Ipv4Range {
        let (addr, prefix) = match self {
            Pool::TenSlash8 => (Ipv4Addr::new(10, 0, 0, 0), 8),
            Pool::OneSevenTwoSixteenSlash12 => (Ipv4Addr::new(172, 16, 0, 0), 12),
        };
        Ipv4Range::truncating(Ipv4Net::new_assert(addr, prefix))
    }

    fn first_octet(&self) -> u8 {
        self.range().network().octets()[0]
    }

    pub fn second_octets(&self) -> RangeInclusive<u8> {
        match self {
            Pool::TenSlash8 => 0..=255,
            Pool::OneSevenTwoSixteenSlash12 => 16..=31,
        }
    }

    /// The pool a /16 start range belongs to.
    pub fn for_start_base(start_base: &Ipv4Range) -> DomainResult<Pool> {
        if start_base.prefix_len() != 16 {
            return Err(DomainError::UnsupportedRange(format!(
                "octet search requires a /16 base (example: 172.16.0.0/16), got {start_base}"
            )));
        }
        Pool::ALL
            .into_iter()
            .find(|pool| pool.range().contains(start_base))
            .ok_or_else(|| {
                DomainError::UnsupportedRange(format!(
                    "octet search supports only 10.x.0.0/16 within 10.0.0.0/8 or \
                     172.16-31.0.0/16 within 172.16.0.0/12, got {start_base}; \
                     use the base strategy for other ranges"
                ))
            })
    }
}

/// Candidate VNets in rollover order, starting at `start_base` and `start_third_octet`.
///
/// The sequence is finite and built fresh on each call.
pub fn rollover_candidates(
    start_base: &Ipv4Range,
    vnet_prefix_len: u8,
    start_third_octet: u8,
) -> DomainResult<impl Iterator<Item = Ipv4Range>> {
    validate_prefix_length(vnet_prefix_len)?;
    if vnet_prefix_len < BLOCK_PREFIX_LEN {
        return Err(DomainError::UnsupportedRange(format!(
            "octet search requires a /24 or smaller VNet, got /{vnet_prefix_len}; \
             use the base strategy for larger VNets"
        )));
    }
    let pool = Pool::for_start_base(start_base)?;
    let first_octet = pool.first_octet();
    let start_second = start_base.network().octets()[1];
    let last_second = *pool.second_octets().end();

    let candidates = (start_second..=last_second)
        .flat_map(move |second| {
            let first_third = if second == start_second { start_third_octet } else { 0 };
            (first_third..=u8::MAX).map(move |third| (second, third))
        })
        .filter_map(move |(second, third)| {
            let addr = Ipv4Addr::new(first_octet, second, third, 0);
            Ipv4Range::new(addr, BLOCK_PREFIX_LEN).ok()
        })
        .flat_map(move |block| block.subranges(vnet_prefix_len).into_iter().flatten());
    Ok(candidates)
}

/// Plan a VNet by walking the pool of `start_base` in rollover order.
pub fn plan_with_rollover(
    used: &[Ipv4Range],
    start_base: &Ipv4Range,
    vnet_prefix_len: u8,
    primary_len: u8,
    secondary_len: u8,
    start_third_octet: u8,
) -> DomainResult<Plan> {
    validate_prefix_length(primary_len)?;
    validate_prefix_length(secondary_len)?;

    let mut last_error: Option<DomainError> = None;
    let mut candidates_tried = 0usize;

    for network in rollover_candidates(start_base, vnet_prefix_len, start_third_octet)? {
        candidates_tried += 1;
        if overlaps_any(&network, used) {
            continue;
        }
        match allocate_siblings(&network, primary_len, secondary_len) {
            Ok((primary, secondary)) => {
                debug!("plan_with_rollover: found {network} after {candidates_tried} candidates");
                return Ok(Plan::new(network, primary, secondary));
            }
            Err(e) => {
                trace!("plan_with_rollover: {network}: {e}");
                last_error = Some(e);
            }
        }
    }
    debug!("plan_with_rollover: exhausted after {candidates_tried} candidates");

    let pool = Pool::for_start_base(start_base)?.range();
    if let Some(covering) = used.iter().find(|u| u.contains(&pool)) {
        return Err(DomainError::PoolExhausted {
            pool,
            covering: *covering,
        });
    }

    let mut message = format!(
        "no non-overlapping VNet found after trying {candidates_tried} candidates \
         starting at {start_base}"
    );
    if let Some(e) = last_error {
        message.push_str(&format!("; last error: {e}"));
    }
    Err(DomainError::NoCapacity(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn r(s: &str) -> Ipv4Range {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("10.0.0.0/16", Pool::TenSlash8)]
    #[case("10.255.0.0/16", Pool::TenSlash8)]
    #[case("172.16.0.0/16", Pool::OneSevenTwoSixteenSlash12)]
    #[case("172.31.0.0/16", Pool::OneSevenTwoSixteenSlash12)]
    fn given_private_slash16_when_identifying_pool_then_found(
        #[case] base: &str,
        #[case] expected: Pool,
    ) {
        assert_eq!(Pool::for_start_base(&r(base)).unwrap(), expected);
    }

    #[rstest]
    #[case("192.168.0.0/16")]
    #[case("172.32.0.0/16")]
    #[case("10.0.0.0/15")]
    #[case("10.0.0.0/24")]
    fn given_other_base_when_identifying_pool_then_unsupported(#[case] base: &str) {
        assert!(matches!(
            Pool::for_start_base(&r(base)),
            Err(DomainError::UnsupportedRange(_))
        ));
    }

    #[test]
    fn given_pool_ranges_then_match_private_spaces() {
        assert_eq!(Pool::TenSlash8.range(), r("10.0.0.0/8"));
        assert_eq!(Pool::OneSevenTwoSixteenSlash12.range(), r("172.16.0.0/12"));
    }

    #[test]
    fn given_start_third_octet_when_enumerating_then_rolls_into_next_second_octet() {
        let candidates: Vec<_> = rollover_candidates(&r("172.16.0.0/16"), 24, 254)
            .unwrap()
            .take(4)
            .collect();
        assert_eq!(
            candidates,
            vec![
                r("172.16.254.0/24"),
                r("172.16.255.0/24"),
                r("172.17.0.0/24"),
                r("172.17.1.0/24"),
            ]
        );
    }

    #[test]
    fn given_small_vnet_when_enumerating_then_carves_each_block_in_order() {
        let candidates: Vec<_> = rollover_candidates(&r("10.5.0.0/16"), 26, 1)
            .unwrap()
            .take(5)
            .collect();
        assert_eq!(
            candidates,
            vec![
                r("10.5.1.0/26"),
                r("10.5.1.64/26"),
                r("10.5.1.128/26"),
                r("10.5.1.192/26"),
                r("10.5.2.0/26"),
            ]
        );
    }

    #[test]
    fn given_last_second_octet_when_enumerating_then_stops_at_pool_end() {
        let candidates: Vec<_> = rollover_candidates(&r("172.31.0.0/16"), 24, 250)
            .unwrap()
            .collect();
        assert_eq!(candidates.len(), 6);
        assert_eq!(candidates.last(), Some(&r("172.31.255.0/24")));
    }

    #[test]
    fn given_vnet_larger_than_block_when_enumerating_then_unsupported() {
        assert!(matches!(
            rollover_candidates(&r("10.0.0.0/16"), 23, 1).err(),
            Some(DomainError::UnsupportedRange(_))
        ));
    }

    #[test]
    fn given_empty_used_when_planning_then_first_candidate_wins() {
        let start = r("172.16.0.0/16");
        let plan = plan_with_rollover(&[], &start, 24, 27, 27, 1).unwrap();
        assert_eq!(plan.network(), r("172.16.1.0/24"));
        assert_eq!(plan.primary_subnet(), r("172.16.1.0/27"));
        assert_eq!(plan.secondary_subnet(), r("172.16.1.32/27"));
    }

    #[test]
    fn given_unpackable_subnets_when_planning_then_no_capacity_with_count_and_last_error() {
        let start = r("172.31.0.0/16");
        let err = plan_with_rollover(&[], &start, 24, 24, 24, 250).unwrap_err();
        match err {
            DomainError::NoCapacity(message) => {
                assert!(message.contains("after trying 6 candidates"), "{message}");
                assert!(message.contains("last error"), "{message}");
            }
            other => panic!("expected NoCapacity, got {other:?}"),
        }
    }
}
