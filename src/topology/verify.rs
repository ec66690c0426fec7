// Copyright (c) 2025 - Cowboy AI, Inc.
//! Routing and Addressing Checks over a Plan
//!
//! Runs over the resource graph only, so a plan can be verified before any
//! declaration is issued.

use std::collections::{BTreeSet, HashMap};

use crate::domain::invariants::{
    validate_subnets_disjoint, validate_subnets_within, ValidationError, ValidationResult,
};
use crate::domain::{Ipv4Cidr, ResourceKind, SubnetRole};
use crate::graph::{ResourceGraph, ResourceId, ResourceNode, ResourceSpec, RouteTarget};

use super::descriptor::TopologyPlan;

struct PlannedSubnet<'a> {
    id: &'a ResourceId,
    cidr: Ipv4Cidr,
    zone: &'a str,
    role: SubnetRole,
}

/// Verify every topology invariant a plan must hold
///
/// Checks, in order: subnet addressing, one association per subnet, that no
/// private route table or NAT gateway serves more than one zone, and the
/// egress of each subnet's route table.
pub fn verify_plan(plan: &TopologyPlan) -> ValidationResult {
    let graph = plan.graph();
    let subnets = planned_subnets(graph);

    let cidrs: Vec<Ipv4Cidr> = subnets.iter().map(|s| s.cidr).collect();
    validate_subnets_within(&plan.layout().network(), &cidrs)?;
    validate_subnets_disjoint(&cidrs)?;

    let tables = subnets
        .iter()
        .map(|subnet| associated_route_table(graph, subnet.id))
        .collect::<Result<Vec<_>, _>>()?;

    verify_zone_local_egress(graph, &subnets, &tables)?;

    for (subnet, table) in subnets.iter().zip(&tables) {
        let egress = default_egress(table)
            .ok_or_else(|| invalid_egress(table, subnet, "no default route".to_string()))?;

        match (subnet.role, egress) {
            (SubnetRole::Public, RouteTarget::InternetGateway(gateway)) => {
                expect_kind(graph, gateway, ResourceKind::InternetGateway, table, subnet)?;
            }
            (SubnetRole::Private, RouteTarget::NatGateway(nat)) => {
                let nat_node = expect_kind(graph, nat, ResourceKind::NatGateway, table, subnet)?;
                if nat_node.spec.availability_zone() != Some(subnet.zone) {
                    return Err(invalid_egress(
                        table,
                        subnet,
                        format!("NAT gateway '{}' is in another zone", nat),
                    ));
                }
            }
            (SubnetRole::Public, RouteTarget::NatGateway(nat)) => {
                return Err(invalid_egress(
                    table,
                    subnet,
                    format!("public subnet routes through NAT gateway '{}'", nat),
                ));
            }
            (SubnetRole::Private, RouteTarget::InternetGateway(gateway)) => {
                return Err(invalid_egress(
                    table,
                    subnet,
                    format!("private subnet routes directly to '{}'", gateway),
                ));
            }
        }
    }

    Ok(())
}

/// Private route tables and their NAT gateways must each serve one zone
///
/// Shared route tables are reported before shared NAT gateways, each in plan
/// order.
fn verify_zone_local_egress(
    graph: &ResourceGraph,
    subnets: &[PlannedSubnet<'_>],
    tables: &[&ResourceNode],
) -> ValidationResult {
    let mut table_zones: HashMap<&ResourceId, BTreeSet<&str>> = HashMap::new();
    let mut nat_zones: HashMap<&ResourceId, BTreeSet<&str>> = HashMap::new();

    for (subnet, table) in subnets.iter().zip(tables) {
        if subnet.role != SubnetRole::Private {
            continue;
        }
        table_zones.entry(&table.id).or_default().insert(subnet.zone);
        if let Some(RouteTarget::NatGateway(nat)) = default_egress(table) {
            nat_zones.entry(nat).or_default().insert(subnet.zone);
        }
    }

    for shared in [&table_zones, &nat_zones] {
        let resource = graph
            .nodes()
            .iter()
            .find(|node| shared.get(&node.id).is_some_and(|zones| zones.len() > 1));
        if let Some(node) = resource {
            return Err(ValidationError::CrossZoneSharing {
                resource: node.id.to_string(),
            });
        }
    }

    Ok(())
}

fn planned_subnets(graph: &ResourceGraph) -> Vec<PlannedSubnet<'_>> {
    graph
        .nodes_of_kind(ResourceKind::Subnet)
        .filter_map(|node| match &node.spec {
            ResourceSpec::Subnet {
                cidr,
                availability_zone,
                role,
                ..
            } => Some(PlannedSubnet {
                id: &node.id,
                cidr: *cidr,
                zone: availability_zone,
                role: *role,
            }),
            _ => None,
        })
        .collect()
}

fn associated_route_table<'g>(
    graph: &'g ResourceGraph,
    subnet: &ResourceId,
) -> Result<&'g ResourceNode, ValidationError> {
    let tables: Vec<&ResourceId> = graph
        .nodes_of_kind(ResourceKind::RouteTableAssociation)
        .filter_map(|node| match &node.spec {
            ResourceSpec::RouteTableAssociation {
                subnet: associated,
                route_table,
            } if associated == subnet => Some(route_table),
            _ => None,
        })
        .collect();

    match tables.as_slice() {
        [] => Err(ValidationError::MissingAssociation(subnet.to_string())),
        [table] => graph
            .get(table)
            .filter(|node| node.kind() == ResourceKind::RouteTable)
            .ok_or_else(|| ValidationError::InvalidEgress {
                route_table: table.to_string(),
                subnet: subnet.to_string(),
                reason: "association does not point at a route table".to_string(),
            }),
        _ => Err(ValidationError::MultipleAssociations {
            subnet: subnet.to_string(),
            count: tables.len(),
        }),
    }
}

fn default_egress(table: &ResourceNode) -> Option<&RouteTarget> {
    match &table.spec {
        ResourceSpec::RouteTable { routes, .. } => routes
            .iter()
            .find(|route| route.is_default())
            .map(|route| &route.target),
        _ => None,
    }
}

fn expect_kind<'g>(
    graph: &'g ResourceGraph,
    target: &ResourceId,
    kind: ResourceKind,
    table: &ResourceNode,
    subnet: &PlannedSubnet<'_>,
) -> Result<&'g ResourceNode, ValidationError> {
    graph
        .get(target)
        .filter(|node| node.kind() == kind)
        .ok_or_else(|| invalid_egress(table, subnet, format!("'{}' is not a {}", target, kind)))
}

fn invalid_egress(
    table: &ResourceNode,
    subnet: &PlannedSubnet<'_>,
    reason: String,
) -> ValidationError {
    ValidationError::InvalidEgress {
        route_table: table.id.to_string(),
        subnet: subnet.id.to_string(),
        reason,
    }
}
