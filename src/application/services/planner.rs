//! Planning service
//!
//! Resolves requested sizes into prefix lengths and dispatches to the
//! allocator of the chosen strategy.

use tracing::{debug, info, instrument};

use crate::application::{
    ApplicationResult, PlanRequest, ResolvedSizing, SearchStrategy, SubnetSize, VnetSize,
};
use crate::domain::{
    address_count, plan_with_rollover, plan_within_base, prefix, prefix_length_for_usable_hosts,
    required_prefix_length, Ipv4Range, Plan, RESERVED_ADDRESSES_PER_SUBNET,
};

/// Service computing VNet/subnet plans.
///
/// Stateless apart from the subnet reservation; every call re-derives its
/// candidates from scratch.
#[derive(Debug, Clone)]
pub struct PlannerService {
    reserved_addresses: u64,
}

impl Default for PlannerService {
    fn default() -> Self {
        Self::new(RESERVED_ADDRESSES_PER_SUBNET)
    }
}

impl PlannerService {
    /// Create a planner reserving `reserved_addresses` in every subnet.
    pub fn new(reserved_addresses: u64) -> Self {
        Self { reserved_addresses }
    }

    /// Turn the requested sizes into prefix lengths.
    pub fn resolve(&self, request: &PlanRequest) -> ApplicationResult<ResolvedSizing> {
        let primary_prefix_len = self.subnet_prefix(request.primary)?;
        let secondary_prefix_len = self.subnet_prefix(request.secondary)?;

        let vnet_prefix_len = match request.vnet {
            VnetSize::PrefixLength(len) => prefix::validate_prefix_length(len)?,
            VnetSize::TotalAddresses(total) => required_prefix_length(total)?,
            VnetSize::FitSubnets => {
                let total =
                    address_count(primary_prefix_len)? + address_count(secondary_prefix_len)?;
                required_prefix_length(total)?
            }
        };

        Ok(ResolvedSizing {
            vnet_prefix_len,
            primary_prefix_len,
            secondary_prefix_len,
        })
    }

    fn subnet_prefix(&self, size: SubnetSize) -> ApplicationResult<u8> {
        let len = match size {
            SubnetSize::PrefixLength(len) => prefix::validate_prefix_length(len)?,
            SubnetSize::UsableHosts(hosts) => {
                prefix_length_for_usable_hosts(hosts, self.reserved_addresses)?
            }
        };
        Ok(len)
    }

    /// Compute a plan that avoids every range in `used`.
    #[instrument(level = "debug", skip(self, used), fields(used = used.len()))]
    pub fn plan(&self, request: &PlanRequest, used: &[Ipv4Range]) -> ApplicationResult<Plan> {
        let sizing = self.resolve(request)?;
        debug!("plan: resolved sizing {:?}", sizing);

        let plan = match request.strategy {
            SearchStrategy::BoundedBase => plan_within_base(
                used,
                &request.base,
                sizing.vnet_prefix_len,
                sizing.primary_prefix_len,
                sizing.secondary_prefix_len,
            )?,
            SearchStrategy::OctetRollover => plan_with_rollover(
                used,
                &request.base,
                sizing.vnet_prefix_len,
                sizing.primary_prefix_len,
                sizing.secondary_prefix_len,
                request.start_third_octet,
            )?,
        };

        info!(
            "planned vnet {} (primary {}, secondary {})",
            plan.network(),
            plan.primary_subnet(),
            plan.secondary_subnet()
        );
        Ok(plan)
    }
}
