//! Planning request: what the caller asks for, before prefix resolution

use std::net::Ipv4Addr;

use clap::ValueEnum;
use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};

use crate::domain::Ipv4Range;

/// How candidate VNets are searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum SearchStrategy {
    /// Search only inside the base range, growing the VNet when subnets don't fit
    #[serde(rename = "base", alias = "bounded-base")]
    #[value(name = "base", alias = "bounded-base")]
    BoundedBase,
    /// Walk /24 blocks of the base's private pool, third octet then second octet
    #[default]
    #[serde(rename = "octets", alias = "octet-rollover")]
    #[value(name = "octets", alias = "octet-rollover")]
    OctetRollover,
}

/// Requested VNet size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VnetSize {
    PrefixLength(u8),
    /// Rounded up to the next power of two
    TotalAddresses(u64),
    /// Smallest block that could hold both subnets side by side
    FitSubnets,
}

/// Requested subnet size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetSize {
    PrefixLength(u8),
    /// Usable addresses; the per-subnet reservation is added on top
    UsableHosts(u64),
}

impl SubnetSize {
    pub fn is_host_count(&self) -> bool {
        matches!(self, SubnetSize::UsableHosts(_))
    }
}

/// Everything needed to compute one plan, except the used ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    /// Search base (bounded strategy) or start /16 (octet strategy)
    pub base: Ipv4Range,
    pub strategy: SearchStrategy,
    pub vnet: VnetSize,
    pub primary: SubnetSize,
    pub secondary: SubnetSize,
    /// First third octet tried by the octet strategy
    pub start_third_octet: u8,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            base: Ipv4Range::truncating(Ipv4Net::new_assert(Ipv4Addr::new(172, 16, 0, 0), 16)),
            strategy: SearchStrategy::default(),
            vnet: VnetSize::PrefixLength(24),
            primary: SubnetSize::PrefixLength(27),
            secondary: SubnetSize::PrefixLength(27),
            start_third_octet: 1,
        }
    }
}

/// Prefix lengths after sizing rules have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSizing {
    pub vnet_prefix_len: u8,
    pub primary_prefix_len: u8,
    pub secondary_prefix_len: u8,
}
