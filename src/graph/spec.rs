// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Intents
//!
//! A [`ResourceSpec`] describes one resource to declare. It is generic over
//! the type used to reference other resources:
//!
//! - In a plan, references are logical [`ResourceId`]s and define the
//!   dependency edges of the graph.
//! - When declared, references are resolved to provider handles with
//!   [`ResourceSpec::try_map_refs`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{Ipv4Cidr, ResourceKind, SubnetRole, Tags};

/// Logical identifier of a resource within a plan (its `Name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Where a route sends traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum RouteTarget<R = ResourceId> {
    InternetGateway(R),
    NatGateway(R),
}

impl<R> RouteTarget<R> {
    pub fn reference(&self) -> &R {
        match self {
            Self::InternetGateway(r) | Self::NatGateway(r) => r,
        }
    }
}

/// One route entry of a route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route<R = ResourceId> {
    pub destination: Ipv4Cidr,
    pub target: RouteTarget<R>,
}

impl<R> Route<R> {
    /// `0.0.0.0/0` to `target`
    pub fn default_to(target: RouteTarget<R>) -> Self {
        Self {
            destination: Ipv4Cidr::DEFAULT_ROUTE,
            target,
        }
    }

    pub fn is_default(&self) -> bool {
        self.destination == Ipv4Cidr::DEFAULT_ROUTE
    }
}

/// Intent to declare one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceSpec<R = ResourceId> {
    Network {
        cidr: Ipv4Cidr,
        enable_dns_hostnames: bool,
        enable_dns_support: bool,
        tags: Tags,
    },
    InternetGateway {
        network: R,
        tags: Tags,
    },
    Subnet {
        network: R,
        cidr: Ipv4Cidr,
        availability_zone: String,
        role: SubnetRole,
        map_public_ip_on_launch: bool,
        tags: Tags,
    },
    ElasticAddress {
        availability_zone: String,
        tags: Tags,
    },
    NatGateway {
        subnet: R,
        allocation: R,
        availability_zone: String,
        tags: Tags,
    },
    RouteTable {
        network: R,
        routes: Vec<Route<R>>,
        availability_zone: Option<String>,
        tags: Tags,
    },
    RouteTableAssociation {
        subnet: R,
        route_table: R,
    },
}

impl<R> ResourceSpec<R> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Network { .. } => ResourceKind::Network,
            Self::InternetGateway { .. } => ResourceKind::InternetGateway,
            Self::Subnet { .. } => ResourceKind::Subnet,
            Self::ElasticAddress { .. } => ResourceKind::ElasticAddress,
            Self::NatGateway { .. } => ResourceKind::NatGateway,
            Self::RouteTable { .. } => ResourceKind::RouteTable,
            Self::RouteTableAssociation { .. } => ResourceKind::RouteTableAssociation,
        }
    }

    /// Tags, if the kind carries any
    pub fn tags(&self) -> Option<&Tags> {
        match self {
            Self::Network { tags, .. }
            | Self::InternetGateway { tags, .. }
            | Self::Subnet { tags, .. }
            | Self::ElasticAddress { tags, .. }
            | Self::NatGateway { tags, .. }
            | Self::RouteTable { tags, .. } => Some(tags),
            Self::RouteTableAssociation { .. } => None,
        }
    }

    /// Zone the resource is pinned to, if any
    pub fn availability_zone(&self) -> Option<&str> {
        match self {
            Self::Subnet {
                availability_zone, ..
            }
            | Self::ElasticAddress {
                availability_zone, ..
            }
            | Self::NatGateway {
                availability_zone, ..
            } => Some(availability_zone),
            Self::RouteTable {
                availability_zone, ..
            } => availability_zone.as_deref(),
            _ => None,
        }
    }

    /// Every resource this one refers to, in field order
    pub fn references(&self) -> Vec<&R> {
        match self {
            Self::Network { .. } | Self::ElasticAddress { .. } => Vec::new(),
            Self::InternetGateway { network, .. } | Self::Subnet { network, .. } => vec![network],
            Self::NatGateway {
                subnet, allocation, ..
            } => vec![subnet, allocation],
            Self::RouteTable {
                network, routes, ..
            } => std::iter::once(network)
                .chain(routes.iter().map(|r| r.target.reference()))
                .collect(),
            Self::RouteTableAssociation {
                subnet,
                route_table,
            } => vec![subnet, route_table],
        }
    }

    /// Rewrite every reference, failing on the first one `f` rejects
    pub fn try_map_refs<T, E>(
        &self,
        mut f: impl FnMut(&R) -> Result<T, E>,
    ) -> Result<ResourceSpec<T>, E> {
        let spec = match self {
            Self::Network {
                cidr,
                enable_dns_hostnames,
                enable_dns_support,
                tags,
            } => ResourceSpec::Network {
                cidr: *cidr,
                enable_dns_hostnames: *enable_dns_hostnames,
                enable_dns_support: *enable_dns_support,
                tags: tags.clone(),
            },
            Self::InternetGateway { network, tags } => ResourceSpec::InternetGateway {
                network: f(network)?,
                tags: tags.clone(),
            },
            Self::Subnet {
                network,
                cidr,
                availability_zone,
                role,
                map_public_ip_on_launch,
                tags,
            } => ResourceSpec::Subnet {
                network: f(network)?,
                cidr: *cidr,
                availability_zone: availability_zone.clone(),
                role: *role,
                map_public_ip_on_launch: *map_public_ip_on_launch,
                tags: tags.clone(),
            },
            Self::ElasticAddress {
                availability_zone,
                tags,
            } => ResourceSpec::ElasticAddress {
                availability_zone: availability_zone.clone(),
                tags: tags.clone(),
            },
            Self::NatGateway {
                subnet,
                allocation,
                availability_zone,
                tags,
            } => ResourceSpec::NatGateway {
                subnet: f(subnet)?,
                allocation: f(allocation)?,
                availability_zone: availability_zone.clone(),
                tags: tags.clone(),
            },
            Self::RouteTable {
                network,
                routes,
                availability_zone,
                tags,
            } => {
                let network = f(network)?;
                let mut mapped = Vec::with_capacity(routes.len());
                for route in routes {
                    let target = match &route.target {
                        RouteTarget::InternetGateway(r) => RouteTarget::InternetGateway(f(r)?),
                        RouteTarget::NatGateway(r) => RouteTarget::NatGateway(f(r)?),
                    };
                    mapped.push(Route {
                        destination: route.destination,
                        target,
                    });
                }
                ResourceSpec::RouteTable {
                    network,
                    routes: mapped,
                    availability_zone: availability_zone.clone(),
                    tags: tags.clone(),
                }
            }
            Self::RouteTableAssociation {
                subnet,
                route_table,
            } => ResourceSpec::RouteTableAssociation {
                subnet: f(subnet)?,
                route_table: f(route_table)?,
            },
        };
        Ok(spec)
    }
}
