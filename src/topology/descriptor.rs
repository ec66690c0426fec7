// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Plans and Descriptors
//!
//! [`TopologyResources`] lists the resources of a topology by role. It is
//! generic over the reference type like [`ResourceSpec`]: a plan holds
//! logical [`ResourceId`]s, a provisioned [`NetworkTopology`] holds the
//! handles the provider returned. All per-zone lists follow zone order.
//!
//! [`ResourceSpec`]: crate::graph::ResourceSpec

use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{AvailabilityZone, Ipv4Cidr, ResourceKind, SubnetLayout, SubnetRole};
use crate::errors::TopologyResult;
use crate::graph::{GraphError, ResourceGraph, ResourceId, ResourceNode, ResourceSpec};
use crate::provider::ResourceHandle;

/// Resources of one topology, grouped by role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopologyResources<R = ResourceId> {
    pub network: R,
    pub internet_gateway: R,
    pub public_subnets: Vec<R>,
    pub private_subnets: Vec<R>,
    pub elastic_addresses: Vec<R>,
    pub nat_gateways: Vec<R>,
    pub public_route_table: R,
    pub private_route_tables: Vec<R>,
    pub public_associations: Vec<R>,
    pub private_associations: Vec<R>,
}

impl<R> TopologyResources<R> {
    /// Subnets with `role`, in zone order
    pub fn subnets(&self, role: SubnetRole) -> &[R] {
        match role {
            SubnetRole::Public => &self.public_subnets,
            SubnetRole::Private => &self.private_subnets,
        }
    }

    /// Rewrite every reference, failing on the first one `f` rejects
    pub fn try_map<T, E>(
        &self,
        mut f: impl FnMut(&R) -> Result<T, E>,
    ) -> Result<TopologyResources<T>, E> {
        let mut each = |refs: &[R]| refs.iter().map(&mut f).collect::<Result<Vec<T>, E>>();

        Ok(TopologyResources {
            public_subnets: each(&self.public_subnets)?,
            private_subnets: each(&self.private_subnets)?,
            elastic_addresses: each(&self.elastic_addresses)?,
            nat_gateways: each(&self.nat_gateways)?,
            private_route_tables: each(&self.private_route_tables)?,
            public_associations: each(&self.public_associations)?,
            private_associations: each(&self.private_associations)?,
            network: f(&self.network)?,
            internet_gateway: f(&self.internet_gateway)?,
            public_route_table: f(&self.public_route_table)?,
        })
    }
}

/// Side-effect free description of everything a topology declares
#[derive(Debug, Clone, Serialize)]
pub struct TopologyPlan {
    pub(crate) deployment: String,
    pub(crate) layout: SubnetLayout,
    pub(crate) zones: Vec<AvailabilityZone>,
    pub(crate) resources: TopologyResources,
    pub(crate) graph: ResourceGraph,
}

impl TopologyPlan {
    /// Deployment name the plan was built for
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn layout(&self) -> &SubnetLayout {
        &self.layout
    }

    pub fn zones(&self) -> &[AvailabilityZone] {
        &self.zones
    }

    pub fn resources(&self) -> &TopologyResources {
        &self.resources
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    /// Planned node for `id`
    pub fn node(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.graph.get(id)
    }

    /// Number of declarations the plan issues
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Number of planned resources of `kind`
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.graph.nodes_of_kind(kind).count()
    }

    /// CIDR blocks of the subnets with `role`, in zone order
    pub fn subnet_cidrs(&self, role: SubnetRole) -> Vec<Ipv4Cidr> {
        self.resources
            .subnets(role)
            .iter()
            .filter_map(|id| match self.graph.get(id).map(|n| &n.spec) {
                Some(ResourceSpec::Subnet { cidr, .. }) => Some(*cidr),
                _ => None,
            })
            .collect()
    }

    /// Pretty-printed JSON rendering of the plan
    pub fn to_json(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Handles of a provisioned topology
///
/// This is what callers wire the cluster into: the network handle and the
/// ordered public and private subnet handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTopology {
    /// Correlation id of the provisioning run
    pub correlation_id: Uuid,
    pub zones: Vec<AvailabilityZone>,
    #[serde(flatten)]
    pub resources: TopologyResources<ResourceHandle>,
}

impl NetworkTopology {
    /// Resolve a plan's logical ids through the handles a run produced
    pub(crate) fn resolve(
        plan: &TopologyPlan,
        handles: &HashMap<ResourceId, ResourceHandle>,
        correlation_id: Uuid,
    ) -> Result<Self, GraphError> {
        let resources = plan.resources.try_map(|id| {
            handles
                .get(id)
                .cloned()
                .ok_or_else(|| GraphError::UnknownDependency {
                    resource: ResourceId::new(plan.deployment()),
                    dependency: id.clone(),
                })
        })?;

        Ok(Self {
            correlation_id,
            zones: plan.zones.clone(),
            resources,
        })
    }

    pub fn network(&self) -> &ResourceHandle {
        &self.resources.network
    }

    pub fn public_subnets(&self) -> &[ResourceHandle] {
        &self.resources.public_subnets
    }

    pub fn private_subnets(&self) -> &[ResourceHandle] {
        &self.resources.private_subnets
    }

    pub fn to_json(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(prefix: &str, n: usize) -> Vec<ResourceId> {
        (0..n).map(|i| ResourceId::new(format!("{prefix}-{i}"))).collect()
    }

    fn resources() -> TopologyResources {
        TopologyResources {
            network: "demo".into(),
            internet_gateway: "demo-igw".into(),
            public_subnets: ids("public", 2),
            private_subnets: ids("private", 2),
            elastic_addresses: ids("eip", 2),
            nat_gateways: ids("nat", 2),
            public_route_table: "demo-public-rt".into(),
            private_route_tables: ids("private-rt", 2),
            public_associations: ids("public-rta", 2),
            private_associations: ids("private-rta", 2),
        }
    }

    #[test]
    fn test_try_map_keeps_zone_order() {
        let mapped = resources()
            .try_map(|id| Ok::<_, ()>(id.as_str().to_uppercase()))
            .unwrap();

        assert_eq!(mapped.network, "DEMO");
        assert_eq!(mapped.public_subnets, vec!["PUBLIC-0", "PUBLIC-1"]);
        assert_eq!(mapped.subnets(SubnetRole::Private), ["PRIVATE-0", "PRIVATE-1"]);
    }

    #[test]
    fn test_try_map_stops_on_first_error() {
        let result = resources().try_map(|id| {
            if id.as_str() == "nat-1" {
                Err(id.clone())
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err(ResourceId::new("nat-1")));
    }
}
