//! Planning result

use serde::Serialize;

use crate::domain::Ipv4Range;

/// A VNet range and the two subnets carved out of it.
///
/// Produced once per successful allocation and never modified. Field
/// names serialise to the Bicep parameter names the ranges are meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    #[serde(rename = "vnetAddressPrefix")]
    network: Ipv4Range,
    #[serde(rename = "webAppSubnetAddressPrefix")]
    primary_subnet: Ipv4Range,
    #[serde(rename = "privateEndpointSubnetAddressPrefix")]
    secondary_subnet: Ipv4Range,
}

impl Plan {
    pub(crate) fn new(
        network: Ipv4Range,
        primary_subnet: Ipv4Range,
        secondary_subnet: Ipv4Range,
    ) -> Self {
        debug_assert!(network.contains(&primary_subnet));
        debug_assert!(network.contains(&secondary_subnet));
        debug_assert!(!primary_subnet.overlaps(&secondary_subnet));
        Self {
            network,
            primary_subnet,
            secondary_subnet,
        }
    }

    /// The VNet address space.
    pub fn network(&self) -> Ipv4Range {
        self.network
    }

    /// Application-facing subnet.
    pub fn primary_subnet(&self) -> Ipv4Range {
        self.primary_subnet
    }

    /// Private-connectivity subnet.
    pub fn secondary_subnet(&self) -> Ipv4Range {
        self.secondary_subnet
    }

    /// Parameter name / CIDR pairs in output order.
    pub fn parameters(&self) -> [(&'static str, String); 3] {
        [
            ("vnetAddressPrefix", self.network.to_string()),
            ("webAppSubnetAddressPrefix", self.primary_subnet.to_string()),
            (
                "privateEndpointSubnetAddressPrefix",
                self.secondary_subnet.to_string(),
            ),
        ]
    }
}
