// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-network-topology
//!
//! Deterministic configurations and lookups shared by the integration
//! tests. All names, regions and CIDRs are fixed constants.

#![allow(dead_code)]

use std::collections::HashMap;

use cim_network_topology::graph::{ResourceId, ResourceNode, ResourceSpec, RouteTarget};
use cim_network_topology::{TopologyConfig, TopologyPlan};

pub const DEPLOYMENT: &str = "demo";
pub const REGION: &str = "us-east-1";

/// Default three-zone configuration for `demo` in `us-east-1`
pub fn demo_config() -> TopologyConfig {
    TopologyConfig::parse(DEPLOYMENT, REGION).expect("Invalid fixture configuration")
}

/// Same as [`demo_config`] with `zones` availability zones
pub fn demo_config_with_zones(zones: usize) -> TopologyConfig {
    demo_config().with_zone_count(zones)
}

/// Environment lookup backed by fixed key/value pairs
pub fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

/// Node of the plan named `name`
pub fn node<'p>(plan: &'p TopologyPlan, name: &str) -> &'p ResourceNode {
    plan.node(&ResourceId::new(name))
        .unwrap_or_else(|| panic!("{name} is not part of the plan"))
}

/// Default route target of the route table named `name`
pub fn default_route_target<'p>(plan: &'p TopologyPlan, name: &str) -> &'p RouteTarget {
    match &node(plan, name).spec {
        ResourceSpec::RouteTable { routes, .. } => &routes
            .iter()
            .find(|r| r.is_default())
            .unwrap_or_else(|| panic!("{name} has no default route"))
            .target,
        other => panic!("{name} is a {}, not a route table", other.kind()),
    }
}

/// Route tables associated with the subnet named `subnet`
pub fn associated_tables<'p>(plan: &'p TopologyPlan, subnet: &str) -> Vec<&'p ResourceId> {
    plan.graph()
        .nodes()
        .iter()
        .filter_map(|n| match &n.spec {
            ResourceSpec::RouteTableAssociation {
                subnet: s,
                route_table,
            } if s.as_str() == subnet => Some(route_table),
            _ => None,
        })
        .collect()
}
