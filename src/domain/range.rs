//! IPv4 range value type and overlap checks

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use ipnet::Ipv4Net;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// An IPv4 address block: network address plus prefix length.
///
/// The base address never carries host bits. Ordering is by numeric base
/// address, then prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ipv4Range(Ipv4Net);

impl Ipv4Range {
    /// Create a range, rejecting addresses with host bits set.
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> DomainResult<Self> {
        let net = Ipv4Net::new(addr, prefix_len).map_err(|_| {
            DomainError::InvalidSize(format!("prefix length /{prefix_len} exceeds /32"))
        })?;
        Self::from_net(net)
    }

    /// Wrap an `Ipv4Net` whose address is already its network address.
    pub fn from_net(net: Ipv4Net) -> DomainResult<Self> {
        if net.addr() != net.network() {
            return Err(DomainError::UnsupportedRange(format!(
                "{net} has host bits set (network address is {}/{})",
                net.network(),
                net.prefix_len()
            )));
        }
        Ok(Self(net))
    }

    /// Wrap an `Ipv4Net`, dropping any host bits.
    ///
    /// Inventory sources report address spaces as written by users, so
    /// `10.1.2.3/16` is read as `10.1.0.0/16`.
    pub fn truncating(net: Ipv4Net) -> Self {
        Self(net.trunc())
    }

    pub fn network(&self) -> Ipv4Addr {
        self.0.network()
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// First address as an integer.
    pub fn start(&self) -> u32 {
        u32::from(self.0.network())
    }

    /// Last address as an integer.
    pub fn end(&self) -> u32 {
        u32::from(self.0.broadcast())
    }

    /// True iff the closed address intervals intersect.
    pub fn overlaps(&self, other: &Ipv4Range) -> bool {
        self.start().max(other.start()) <= self.end().min(other.end())
    }

    /// True iff `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Ipv4Range) -> bool {
        self.start() <= other.start() && other.end() <= self.end()
    }

    /// Sub-ranges at `prefix_len`, lowest address first.
    ///
    /// Fails with `NoCapacity` when `prefix_len` describes a block larger
    /// than `self`, and with `InvalidSize` above /32.
    pub fn subranges(&self, prefix_len: u8) -> DomainResult<impl Iterator<Item = Ipv4Range>> {
        if prefix_len > 32 {
            return Err(DomainError::InvalidSize(format!(
                "prefix length /{prefix_len} exceeds /32"
            )));
        }
        let subnets = self.0.subnets(prefix_len).map_err(|_| {
            DomainError::NoCapacity(format!(
                "requested prefix /{prefix_len} is larger than {self}"
            ))
        })?;
        Ok(subnets.map(Ipv4Range))
    }
}

/// True iff `candidate` intersects any member of `used`.
pub fn overlaps_any(candidate: &Ipv4Range, used: &[Ipv4Range]) -> bool {
    used.iter().any(|u| candidate.overlaps(u))
}

impl fmt::Display for Ipv4Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.network(), self.0.prefix_len())
    }
}

impl FromStr for Ipv4Range {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let net: Ipv4Net = s
            .trim()
            .parse()
            .map_err(|_| DomainError::UnsupportedRange(format!("not an IPv4 CIDR: {s}")))?;
        Self::from_net(net)
    }
}

impl Serialize for Ipv4Range {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Range {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn r(s: &str) -> Ipv4Range {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("10.0.0.0/24", "10.0.0.0/24", true)]
    #[case("10.0.0.0/24", "10.0.0.128/25", true)]
    #[case("10.0.0.0/24", "10.0.1.0/24", false)]
    #[case("10.0.0.0/16", "10.0.255.0/24", true)]
    #[case("0.0.0.0/0", "192.168.1.1/32", true)]
    #[case("10.0.0.0/25", "10.0.0.128/25", false)]
    fn given_two_ranges_when_checking_overlap_then_is_symmetric(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(r(a).overlaps(&r(b)), expected);
        assert_eq!(r(b).overlaps(&r(a)), expected);
    }

    #[test]
    fn given_range_when_checking_overlap_with_itself_then_true() {
        let a = r("172.16.5.0/27");
        assert!(a.overlaps(&a));
    }

    #[test]
    fn given_host_bits_when_parsing_then_rejected() {
        let err = "10.1.2.3/16".parse::<Ipv4Range>().unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedRange(_)));
    }

    #[test]
    fn given_host_bits_when_truncating_then_network_address_kept() {
        let net: Ipv4Net = "10.1.2.3/16".parse().unwrap();
        assert_eq!(Ipv4Range::truncating(net), r("10.1.0.0/16"));
    }

    #[test]
    fn given_garbage_when_parsing_then_rejected() {
        assert!("not-a-cidr".parse::<Ipv4Range>().is_err());
        assert!("fd00::/8".parse::<Ipv4Range>().is_err());
    }

    #[test]
    fn given_range_when_enumerating_subranges_then_ascending_order() {
        let subs: Vec<_> = r("10.0.0.0/24").subranges(26).unwrap().collect();
        assert_eq!(
            subs,
            vec![
                r("10.0.0.0/26"),
                r("10.0.0.64/26"),
                r("10.0.0.128/26"),
                r("10.0.0.192/26"),
            ]
        );
    }

    #[test]
    fn given_same_prefix_when_enumerating_subranges_then_yields_self() {
        let subs: Vec<_> = r("10.0.4.0/24").subranges(24).unwrap().collect();
        assert_eq!(subs, vec![r("10.0.4.0/24")]);
    }

    #[test]
    fn given_larger_prefix_when_enumerating_subranges_then_no_capacity() {
        assert!(matches!(
            r("10.0.0.0/24").subranges(23).err(),
            Some(DomainError::NoCapacity(_))
        ));
    }

    #[test]
    fn given_prefix_above_32_when_enumerating_subranges_then_invalid_size() {
        assert!(matches!(
            r("10.0.0.0/24").subranges(33).err(),
            Some(DomainError::InvalidSize(_))
        ));
    }

    #[test]
    fn given_ranges_when_sorting_then_ordered_by_address_then_prefix() {
        let mut v = vec![r("10.0.1.0/24"), r("10.0.0.0/25"), r("10.0.0.0/24")];
        v.sort();
        assert_eq!(v, vec![r("10.0.0.0/24"), r("10.0.0.0/25"), r("10.0.1.0/24")]);
    }

    #[test]
    fn given_used_set_when_checking_overlaps_any_then_scans_all() {
        let used = vec![r("10.0.0.0/24"), r("10.0.9.0/24")];
        assert!(overlaps_any(&r("10.0.9.128/25"), &used));
        assert!(!overlaps_any(&r("10.0.5.0/24"), &used));
        assert!(!overlaps_any(&r("10.0.5.0/24"), &[]));
    }

    #[test]
    fn given_range_when_serialising_then_cidr_string() {
        let json = serde_json::to_string(&r("172.16.1.0/24")).unwrap();
        assert_eq!(json, "\"172.16.1.0/24\"");
        let back: Ipv4Range = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r("172.16.1.0/24"));
    }
}
