// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Topology Builder
//!
//! # Plan
//!
//! ```text
//! <name>                         network (DNS hostnames + support)
//! <name>-igw                     internet gateway
//! per zone z, in zone order:
//!   <name>-public-<z>            public subnet  (lower half, elb tag)
//!   <name>-private-<z>           private subnet (upper half, internal-elb tag)
//!   <name>-eip-<z>               elastic address
//!   <name>-nat-<z>               NAT gateway in the public subnet
//! <name>-public-rt               0.0.0.0/0 → internet gateway
//!   <name>-public-rta-<z>        one per public subnet
//! per zone z:
//!   <name>-private-rt-<z>        0.0.0.0/0 → <name>-nat-<z>
//!   <name>-private-rta-<z>       private subnet of z only
//! ```
//!
//! # Provisioning
//!
//! Declarations are issued one at a time in creation order. The first
//! rejected declaration aborts the run: the remaining nodes are recorded as
//! skipped and the error is returned with the resource kind and name.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::TopologyConfig;
use crate::domain::{
    derive_zones, AvailabilityZone, DeploymentName, Ipv4Cidr, SubnetLayout, SubnetRole, Tags,
    NAME_TAG,
};
use crate::errors::{TopologyError, TopologyResult};
use crate::graph::{
    GraphError, ResourceGraph, ResourceId, ResourceNode, ResourceSpec, Route, RouteTarget,
};
use crate::provider::{Declaration, ResourceHandle, ResourceProvider};

use super::descriptor::{NetworkTopology, TopologyPlan, TopologyResources};
use super::report::ProvisioningReport;
use super::verify::verify_plan;

/// Build the plan for `config` without touching any provider
///
/// # Errors
///
/// - `Configuration` when the zone count is out of range or the subnets do
///   not fit the network block
/// - `Invariant` when the assembled plan breaks a routing invariant
pub fn plan_topology(config: &TopologyConfig) -> TopologyResult<TopologyPlan> {
    let layout = SubnetLayout::new(config.network_cidr, config.subnet_prefix, config.zone_count)
        .map_err(|e| TopologyError::Configuration(e.to_string()))?;

    let zones = derive_zones(&config.region, layout.zone_count()).ok_or_else(|| {
        TopologyError::Configuration(format!(
            "cannot derive {} zones for region {}",
            layout.zone_count(),
            config.region
        ))
    })?;

    let mut planner = Planner::new(&config.deployment_name);

    let network = planner.add(
        String::new(),
        ResourceSpec::Network {
            cidr: layout.network(),
            enable_dns_hostnames: true,
            enable_dns_support: true,
            tags: Tags::new(),
        },
    )?;

    let internet_gateway = planner.add(
        "igw".to_string(),
        ResourceSpec::InternetGateway {
            network: network.clone(),
            tags: Tags::new(),
        },
    )?;

    let mut public_subnets = Vec::with_capacity(zones.len());
    let mut private_subnets = Vec::with_capacity(zones.len());
    let mut elastic_addresses = Vec::with_capacity(zones.len());
    let mut nat_gateways = Vec::with_capacity(zones.len());

    for zone in &zones {
        let public = planner.add_subnet(&network, &layout, zone, SubnetRole::Public)?;
        let private = planner.add_subnet(&network, &layout, zone, SubnetRole::Private)?;

        let eip = planner.add(
            format!("eip-{}", zone),
            ResourceSpec::ElasticAddress {
                availability_zone: zone.name().to_string(),
                tags: Tags::new(),
            },
        )?;

        let nat = planner.add(
            format!("nat-{}", zone),
            ResourceSpec::NatGateway {
                subnet: public.clone(),
                allocation: eip.clone(),
                availability_zone: zone.name().to_string(),
                tags: Tags::new(),
            },
        )?;

        public_subnets.push(public);
        private_subnets.push(private);
        elastic_addresses.push(eip);
        nat_gateways.push(nat);
    }

    let public_route_table = planner.add(
        "public-rt".to_string(),
        ResourceSpec::RouteTable {
            network: network.clone(),
            routes: vec![Route::default_to(RouteTarget::InternetGateway(
                internet_gateway.clone(),
            ))],
            availability_zone: None,
            tags: Tags::new(),
        },
    )?;

    let mut public_associations = Vec::with_capacity(zones.len());
    for (zone, subnet) in zones.iter().zip(&public_subnets) {
        public_associations.push(planner.add(
            format!("public-rta-{}", zone),
            ResourceSpec::RouteTableAssociation {
                subnet: subnet.clone(),
                route_table: public_route_table.clone(),
            },
        )?);
    }

    let mut private_route_tables = Vec::with_capacity(zones.len());
    let mut private_associations = Vec::with_capacity(zones.len());
    for ((zone, subnet), nat) in zones.iter().zip(&private_subnets).zip(&nat_gateways) {
        let table = planner.add(
            format!("private-rt-{}", zone),
            ResourceSpec::RouteTable {
                network: network.clone(),
                routes: vec![Route::default_to(RouteTarget::NatGateway(nat.clone()))],
                availability_zone: Some(zone.name().to_string()),
                tags: Tags::new(),
            },
        )?;

        let association = planner.add(
            format!("private-rta-{}", zone),
            ResourceSpec::RouteTableAssociation {
                subnet: subnet.clone(),
                route_table: table.clone(),
            },
        )?;

        private_route_tables.push(table);
        private_associations.push(association);
    }

    let plan = TopologyPlan {
        deployment: config.deployment_name.to_string(),
        layout,
        zones,
        resources: TopologyResources {
            network,
            internet_gateway,
            public_subnets,
            private_subnets,
            elastic_addresses,
            nat_gateways,
            public_route_table,
            private_route_tables,
            public_associations,
            private_associations,
        },
        graph: planner.graph,
    };

    verify_plan(&plan)?;

    debug!(
        deployment = %plan.deployment(),
        zones = plan.zones().len(),
        resources = plan.len(),
        "Planned network topology"
    );

    Ok(plan)
}

/// Graph under construction, naming every resource after the deployment
struct Planner<'a> {
    name: &'a DeploymentName,
    graph: ResourceGraph,
}

impl<'a> Planner<'a> {
    fn new(name: &'a DeploymentName) -> Self {
        Self {
            name,
            graph: ResourceGraph::new(),
        }
    }

    /// Add `spec` as `<name>-<suffix>` (or `<name>` for an empty suffix)
    ///
    /// Taggable kinds get their `Name` tag set to the resource name.
    fn add(&mut self, suffix: String, mut spec: ResourceSpec) -> Result<ResourceId, GraphError> {
        let name = if suffix.is_empty() {
            self.name.to_string()
        } else {
            self.name.resource_name(suffix)
        };

        if let Some(tags) = tags_mut(&mut spec) {
            *tags = std::mem::take(tags).with(NAME_TAG, name.as_str());
        }

        let id = ResourceId::new(name);
        self.graph.add(id.clone(), spec)?;
        Ok(id)
    }

    fn add_subnet(
        &mut self,
        network: &ResourceId,
        layout: &SubnetLayout,
        zone: &AvailabilityZone,
        role: SubnetRole,
    ) -> TopologyResult<ResourceId> {
        let cidr: Ipv4Cidr = layout.subnet_cidr(role, zone.index()).ok_or_else(|| {
            TopologyError::Configuration(format!("no {} subnet block for zone {}", role, zone))
        })?;

        let id = self.add(
            format!("{}-{}", role, zone),
            ResourceSpec::Subnet {
                network: network.clone(),
                cidr,
                availability_zone: zone.name().to_string(),
                role,
                map_public_ip_on_launch: role.assigns_public_ip(),
                tags: Tags::new().with(role.load_balancer_tag(), "1"),
            },
        )?;

        Ok(id)
    }
}

fn tags_mut(spec: &mut ResourceSpec) -> Option<&mut Tags> {
    match spec {
        ResourceSpec::Network { tags, .. }
        | ResourceSpec::InternetGateway { tags, .. }
        | ResourceSpec::Subnet { tags, .. }
        | ResourceSpec::ElasticAddress { tags, .. }
        | ResourceSpec::NatGateway { tags, .. }
        | ResourceSpec::RouteTable { tags, .. } => Some(tags),
        ResourceSpec::RouteTableAssociation { .. } => None,
    }
}

/// Plans a multi-zone network topology and declares it to a provider
pub struct NetworkTopologyBuilder<P> {
    config: TopologyConfig,
    provider: P,
    last_report: Option<ProvisioningReport>,
}

impl<P: ResourceProvider> NetworkTopologyBuilder<P> {
    pub fn new(config: TopologyConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            last_report: None,
        }
    }

    pub fn config(&self) -> &TopologyConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Report of the most recent [`provision`](Self::provision) run
    pub fn last_report(&self) -> Option<&ProvisioningReport> {
        self.last_report.as_ref()
    }

    /// Plan the topology without declaring anything
    pub fn plan(&self) -> TopologyResult<TopologyPlan> {
        plan_topology(&self.config)
    }

    /// Plan the topology and declare it, one resource at a time
    ///
    /// # Errors
    ///
    /// - Any planning error, before a single declaration is issued
    /// - `Provisioning` for the first declaration the provider rejects; no
    ///   declaration is issued after it and nothing is rolled back
    pub async fn provision(&mut self) -> TopologyResult<NetworkTopology> {
        let plan = self.plan()?;
        let correlation_id = Uuid::now_v7();
        let order = plan.graph().creation_order();

        info!(
            deployment = %plan.deployment(),
            provider = self.provider.name(),
            correlation_id = %correlation_id,
            zones = plan.zones().len(),
            resources = order.len(),
            "🚀 Provisioning network topology"
        );

        let mut report = ProvisioningReport::new(
            correlation_id,
            plan.deployment(),
            self.provider.name(),
            &order,
            Utc::now(),
        );

        let outcome = declare_in_order(&self.provider, &order, &mut report).await;
        report.finish(Utc::now());
        self.last_report = Some(report);

        let handles = outcome?;
        let topology = NetworkTopology::resolve(&plan, &handles, correlation_id)?;

        info!(
            deployment = %plan.deployment(),
            correlation_id = %correlation_id,
            network = %topology.network(),
            "✅ Network topology provisioned"
        );

        Ok(topology)
    }
}

async fn declare_in_order<P: ResourceProvider>(
    provider: &P,
    order: &[&ResourceNode],
    report: &mut ProvisioningReport,
) -> TopologyResult<HashMap<ResourceId, ResourceHandle>> {
    let mut handles: HashMap<ResourceId, ResourceHandle> = HashMap::with_capacity(order.len());

    for (position, node) in order.iter().enumerate() {
        let spec = node.spec.try_map_refs(|dependency| {
            handles
                .get(dependency)
                .cloned()
                .ok_or_else(|| GraphError::UnknownDependency {
                    resource: node.id.clone(),
                    dependency: dependency.clone(),
                })
        })?;

        let declaration = Declaration {
            name: node.id.to_string(),
            spec,
        };

        report.begin(position, Utc::now())?;
        debug!(kind = %node.kind(), name = %node.id, "Declaring resource");

        match provider.declare(&declaration).await {
            Ok(handle) => {
                debug!(kind = %node.kind(), name = %node.id, handle = %handle, "Declared");
                report.succeed(position, handle.clone(), Utc::now())?;
                handles.insert(node.id.clone(), handle);
            }
            Err(source) => {
                error!(
                    kind = %node.kind(),
                    name = %node.id,
                    error = %source,
                    "❌ Declaration rejected"
                );
                report.fail(position, source.to_string(), Utc::now())?;
                let skipped = report.skip_pending(Utc::now())?;
                if skipped > 0 {
                    warn!(skipped, "Aborting remaining declarations");
                }

                return Err(TopologyError::Provisioning {
                    kind: node.kind(),
                    name: node.id.to_string(),
                    source,
                });
            }
        }
    }

    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResourceKind, ELB_ROLE_TAG, INTERNAL_ELB_ROLE_TAG};
    use crate::provider::InMemoryProvider;
    use crate::state_machine::DeclarationStatus;
    use pretty_assertions::assert_eq;

    fn config() -> TopologyConfig {
        TopologyConfig::parse("demo", "us-east-1").unwrap()
    }

    fn names(plan: &TopologyPlan) -> Vec<&str> {
        plan.graph()
            .creation_order()
            .into_iter()
            .map(|n| n.id.as_str())
            .collect()
    }

    #[test]
    fn test_plan_declaration_order() {
        let plan = plan_topology(&config().with_zone_count(2)).unwrap();

        assert_eq!(
            names(&plan),
            vec![
                "demo",
                "demo-igw",
                "demo-public-us-east-1a",
                "demo-private-us-east-1a",
                "demo-eip-us-east-1a",
                "demo-nat-us-east-1a",
                "demo-public-us-east-1b",
                "demo-private-us-east-1b",
                "demo-eip-us-east-1b",
                "demo-nat-us-east-1b",
                "demo-public-rt",
                "demo-public-rta-us-east-1a",
                "demo-public-rta-us-east-1b",
                "demo-private-rt-us-east-1a",
                "demo-private-rta-us-east-1a",
                "demo-private-rt-us-east-1b",
                "demo-private-rta-us-east-1b",
            ]
        );
    }

    #[test]
    fn test_plan_tags() {
        let plan = plan_topology(&config()).unwrap();

        let public = plan.node(&"demo-public-us-east-1a".into()).unwrap();
        let tags = public.spec.tags().unwrap();
        assert_eq!(tags.name(), Some("demo-public-us-east-1a"));
        assert_eq!(tags.get(ELB_ROLE_TAG), Some("1"));
        assert!(!tags.contains_key(INTERNAL_ELB_ROLE_TAG));

        let private = plan.node(&"demo-private-us-east-1c".into()).unwrap();
        let tags = private.spec.tags().unwrap();
        assert_eq!(tags.get(INTERNAL_ELB_ROLE_TAG), Some("1"));
        assert!(!tags.contains_key(ELB_ROLE_TAG));

        for node in plan.graph().nodes() {
            if node.kind().is_taggable() {
                assert_eq!(node.spec.tags().and_then(Tags::name), Some(node.id.as_str()));
            }
        }
    }

    #[test]
    fn test_capacity_error_is_configuration() {
        let err = plan_topology(&config().with_zone_count(9)).unwrap_err();
        assert!(err.is_configuration(), "{err}");
    }

    #[tokio::test]
    async fn test_provision_returns_ordered_handles() {
        let mut builder = NetworkTopologyBuilder::new(config(), InMemoryProvider::new());
        let topology = builder.provision().await.unwrap();

        assert_eq!(topology.network().id, "vpc-00000001");
        assert_eq!(topology.public_subnets().len(), 3);
        assert_eq!(topology.private_subnets().len(), 3);
        assert_eq!(builder.provider().count(ResourceKind::NatGateway).await, 3);

        let report = builder.last_report().unwrap();
        assert!(report.is_complete());
        assert_eq!(report.correlation_id, topology.correlation_id);
    }

    #[tokio::test]
    async fn test_provision_aborts_on_first_rejection() {
        let provider = InMemoryProvider::new().fail_on(
            ResourceKind::ElasticAddress,
            "demo-eip-us-east-1a",
            "address limit",
        );
        let mut builder = NetworkTopologyBuilder::new(config(), provider);

        let err = builder.provision().await.unwrap_err();
        assert!(err.is_provisioning());

        let report = builder.last_report().unwrap();
        assert_eq!(report.count(DeclarationStatus::Declared), 4);
        assert_eq!(report.count(DeclarationStatus::Failed), 1);
        assert_eq!(
            report.count(DeclarationStatus::Skipped),
            builder.plan().unwrap().len() - 5
        );
    }
}
