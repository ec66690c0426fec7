// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Address Planning
//!
//! Every layout the validator accepts must place all subnets inside the
//! network without overlap, and the validator must accept exactly the
//! layouts whose subnets fit in half the network.

use cim_network_topology::domain::{Ipv4Cidr, SubnetLayout, SubnetRole, MAX_ZONES};
use proptest::prelude::*;
use std::net::Ipv4Addr;

// ============================================================================
// Generators
// ============================================================================

/// Any network block between /8 and /28, with host bits cleared
fn network_block() -> impl Strategy<Value = Ipv4Cidr> {
    (any::<u32>(), 8u8..=28).prop_map(|(bits, prefix)| {
        let mask = u32::MAX << (32 - prefix);
        Ipv4Cidr::new(Ipv4Addr::from(bits & mask), prefix).unwrap()
    })
}

/// Network plus a strictly longer subnet prefix
fn network_and_prefix() -> impl Strategy<Value = (Ipv4Cidr, u8)> {
    network_block().prop_flat_map(|network| {
        (Just(network), (network.prefix_length() + 1)..=32u8)
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: the layout is accepted exactly when it fits
    #[test]
    fn prop_layout_accepted_iff_capacity(
        (network, prefix) in network_and_prefix(),
        zones in 0usize..=40,
    ) {
        let block = 1u64 << (32 - prefix);
        let fits = zones >= 1 && zones <= MAX_ZONES && zones as u64 * block <= network.size() / 2;

        prop_assert_eq!(SubnetLayout::new(network, prefix, zones).is_ok(), fits);
    }

    /// Property: accepted layouts are disjoint and inside the network
    #[test]
    fn prop_subnets_disjoint_and_contained(
        (network, prefix) in network_and_prefix(),
        zones in 1usize..=MAX_ZONES,
    ) {
        let Ok(layout) = SubnetLayout::new(network, prefix, zones) else {
            return Ok(());
        };

        let subnets = layout.all_subnets();
        prop_assert_eq!(subnets.len(), zones * 2);

        for (i, a) in subnets.iter().enumerate() {
            prop_assert!(network.contains(a));
            prop_assert_eq!(a.prefix_length(), prefix);
            for b in &subnets[i + 1..] {
                prop_assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }

    /// Property: public blocks sit in the lower half, private in the upper
    #[test]
    fn prop_roles_split_network_in_halves(
        (network, prefix) in network_and_prefix(),
        zones in 1usize..=MAX_ZONES,
    ) {
        let Ok(layout) = SubnetLayout::new(network, prefix, zones) else {
            return Ok(());
        };
        let (lower, upper) = network.halves().unwrap();

        for i in 0..zones {
            prop_assert!(lower.contains(&layout.subnet_cidr(SubnetRole::Public, i).unwrap()));
            prop_assert!(upper.contains(&layout.subnet_cidr(SubnetRole::Private, i).unwrap()));
        }
    }
}
