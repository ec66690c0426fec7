// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Topology Plans
//!
//! For every zone count the default network holds, the plan has a fixed
//! shape, verifies, and is identical across runs.

use cim_network_topology::domain::{ResourceKind, SubnetRole};
use cim_network_topology::graph::ResourceSpec;
use cim_network_topology::topology::verify_plan;
use cim_network_topology::{plan_topology, TopologyConfig};
use proptest::prelude::*;

fn deployment_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}"
}

fn region() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["us-east-1", "us-west-2", "eu-central-1", "ap-south-1"])
}

fn config(name: &str, region: &str, zones: usize) -> TopologyConfig {
    TopologyConfig::parse(name, region).unwrap().with_zone_count(zones)
}

proptest! {
    /// Property: plan size is 2 shared resources + 4 per zone + public
    /// route table + 1 association per public subnet + 2 per private zone
    #[test]
    fn prop_plan_shape(name in deployment_name(), code in region(), zones in 1usize..=8) {
        let plan = plan_topology(&config(&name, code, zones)).unwrap();

        prop_assert_eq!(plan.len(), 3 + 7 * zones);
        prop_assert_eq!(plan.count(ResourceKind::Network), 1);
        prop_assert_eq!(plan.count(ResourceKind::InternetGateway), 1);
        prop_assert_eq!(plan.count(ResourceKind::Subnet), 2 * zones);
        prop_assert_eq!(plan.count(ResourceKind::NatGateway), zones);
        prop_assert_eq!(plan.count(ResourceKind::RouteTable), 1 + zones);
        prop_assert_eq!(plan.count(ResourceKind::RouteTableAssociation), 2 * zones);
        prop_assert_eq!(plan.subnet_cidrs(SubnetRole::Public).len(), zones);
        prop_assert!(verify_plan(&plan).is_ok());
    }

    /// Property: identical inputs produce identical CIDRs and tags
    #[test]
    fn prop_plan_is_deterministic(name in deployment_name(), code in region(), zones in 1usize..=8) {
        let first = plan_topology(&config(&name, code, zones)).unwrap();
        let second = plan_topology(&config(&name, code, zones)).unwrap();

        prop_assert_eq!(first.graph().nodes(), second.graph().nodes());
        prop_assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    /// Property: every resource name starts with the deployment name and
    /// is unique
    #[test]
    fn prop_names_are_prefixed_and_unique(name in deployment_name(), zones in 1usize..=8) {
        let plan = plan_topology(&config(&name, "us-east-1", zones)).unwrap();
        let mut names: Vec<&str> = plan.graph().nodes().iter().map(|n| n.id.as_str()).collect();

        for n in &names {
            prop_assert!(n.starts_with(name.as_str()));
        }
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), total);
    }

    /// Property: every NAT gateway lives in the public subnet of its zone
    #[test]
    fn prop_nat_in_public_subnet_of_same_zone(zones in 1usize..=8) {
        let plan = plan_topology(&config("demo", "us-east-1", zones)).unwrap();

        for nat in plan.graph().nodes_of_kind(ResourceKind::NatGateway) {
            let ResourceSpec::NatGateway { subnet, availability_zone, .. } = &nat.spec else {
                return Err(TestCaseError::fail("NAT node without NAT spec"));
            };
            let subnet = plan.node(subnet).unwrap();
            match &subnet.spec {
                ResourceSpec::Subnet { role, availability_zone: zone, .. } => {
                    prop_assert_eq!(*role, SubnetRole::Public);
                    prop_assert_eq!(zone, availability_zone);
                }
                other => return Err(TestCaseError::fail(format!("NAT in {}", other.kind()))),
            }
        }
    }
}
