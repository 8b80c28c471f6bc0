//! Tests for PlannerService: sizing resolution and strategy dispatch

use rstest::rstest;

use ipplan::application::services::PlannerService;
use ipplan::application::{ApplicationError, PlanRequest, SearchStrategy, SubnetSize, VnetSize};
use ipplan::domain::{DomainError, Ipv4Range};

fn r(s: &str) -> Ipv4Range {
    s.parse().unwrap()
}

#[test]
fn given_default_request_when_resolving_then_24_27_27() {
    let sizing = PlannerService::default()
        .resolve(&PlanRequest::default())
        .unwrap();

    assert_eq!(sizing.vnet_prefix_len, 24);
    assert_eq!(sizing.primary_prefix_len, 27);
    assert_eq!(sizing.secondary_prefix_len, 27);
}

#[rstest]
#[case(SubnetSize::UsableHosts(27), SubnetSize::UsableHosts(11), 26, 27, 28)]
#[case(SubnetSize::UsableHosts(100), SubnetSize::PrefixLength(27), 24, 25, 27)]
#[case(SubnetSize::UsableHosts(59), SubnetSize::UsableHosts(59), 25, 26, 26)]
fn given_host_counts_when_fitting_subnets_then_vnet_holds_both(
    #[case] primary: SubnetSize,
    #[case] secondary: SubnetSize,
    #[case] vnet: u8,
    #[case] primary_len: u8,
    #[case] secondary_len: u8,
) {
    let request = PlanRequest {
        vnet: VnetSize::FitSubnets,
        primary,
        secondary,
        ..PlanRequest::default()
    };

    let sizing = PlannerService::default().resolve(&request).unwrap();

    assert_eq!(sizing.vnet_prefix_len, vnet);
    assert_eq!(sizing.primary_prefix_len, primary_len);
    assert_eq!(sizing.secondary_prefix_len, secondary_len);
}

#[test]
fn given_total_addresses_when_resolving_then_rounds_up() {
    let request = PlanRequest {
        vnet: VnetSize::TotalAddresses(300),
        ..PlanRequest::default()
    };

    let sizing = PlannerService::default().resolve(&request).unwrap();

    assert_eq!(sizing.vnet_prefix_len, 23);
}

#[test]
fn given_custom_reservation_when_resolving_hosts_then_applied() {
    let request = PlanRequest {
        primary: SubnetSize::UsableHosts(30),
        ..PlanRequest::default()
    };

    let two = PlannerService::new(2).resolve(&request).unwrap();
    let five = PlannerService::new(5).resolve(&request).unwrap();

    assert_eq!(two.primary_prefix_len, 27);
    assert_eq!(five.primary_prefix_len, 26);
}

#[rstest]
#[case(VnetSize::TotalAddresses(0), SubnetSize::PrefixLength(27))]
#[case(VnetSize::TotalAddresses((1 << 32) + 1), SubnetSize::PrefixLength(27))]
#[case(VnetSize::PrefixLength(33), SubnetSize::PrefixLength(27))]
#[case(VnetSize::PrefixLength(24), SubnetSize::UsableHosts(0))]
#[case(VnetSize::PrefixLength(24), SubnetSize::PrefixLength(40))]
fn given_invalid_sizes_when_resolving_then_invalid_size(
    #[case] vnet: VnetSize,
    #[case] primary: SubnetSize,
) {
    let request = PlanRequest {
        vnet,
        primary,
        ..PlanRequest::default()
    };

    let err = PlannerService::default().resolve(&request).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Domain(DomainError::InvalidSize(_))),
        "{err:?}"
    );
}

#[test]
fn given_base_strategy_when_planning_then_searches_inside_base() {
    let request = PlanRequest {
        base: r("192.168.0.0/16"),
        strategy: SearchStrategy::BoundedBase,
        ..PlanRequest::default()
    };
    let used = vec![r("192.168.0.0/24")];

    let plan = PlannerService::default().plan(&request, &used).unwrap();

    assert_eq!(plan.network(), r("192.168.1.0/24"));
    assert_eq!(plan.primary_subnet(), r("192.168.1.0/27"));
    assert_eq!(plan.secondary_subnet(), r("192.168.1.32/27"));
}

#[test]
fn given_octet_strategy_when_planning_then_starts_at_third_octet() {
    let request = PlanRequest {
        base: r("10.5.0.0/16"),
        start_third_octet: 10,
        ..PlanRequest::default()
    };

    let plan = PlannerService::default().plan(&request, &[]).unwrap();

    assert_eq!(plan.network(), r("10.5.10.0/24"));
}

#[test]
fn given_octet_strategy_with_non_private_base_when_planning_then_unsupported_range() {
    let request = PlanRequest {
        base: r("192.168.0.0/16"),
        strategy: SearchStrategy::OctetRollover,
        ..PlanRequest::default()
    };

    let err = PlannerService::default().plan(&request, &[]).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnsupportedRange(_))
    ));
}

#[test]
fn given_host_sizing_with_octet_strategy_when_vnet_exceeds_block_then_unsupported_range() {
    // 200 + 5 and 100 + 5 usable hosts need a /23 VNet
    let request = PlanRequest {
        vnet: VnetSize::FitSubnets,
        primary: SubnetSize::UsableHosts(200),
        secondary: SubnetSize::UsableHosts(100),
        ..PlanRequest::default()
    };

    let err = PlannerService::default().plan(&request, &[]).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::UnsupportedRange(_))
    ));
}
