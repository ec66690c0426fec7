// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Resource Kinds
//!
//! The vocabulary of resources a topology is made of. Kinds are used for
//! error reporting, handle prefixes and quota bookkeeping in providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of network resource a declaration creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Isolated address space (VPC)
    Network,
    /// Internet egress point attached to the network
    InternetGateway,
    /// Zonal subnet, public or private
    Subnet,
    /// Static public address allocated for NAT use
    ElasticAddress,
    /// Zonal NAT gateway
    NatGateway,
    /// Set of routes
    RouteTable,
    /// Binding of a subnet to a route table
    RouteTableAssociation,
}

impl ResourceKind {
    /// All kinds, in dependency order
    pub const ALL: [ResourceKind; 7] = [
        Self::Network,
        Self::InternetGateway,
        Self::Subnet,
        Self::ElasticAddress,
        Self::NatGateway,
        Self::RouteTable,
        Self::RouteTableAssociation,
    ];

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::InternetGateway => "internet_gateway",
            Self::Subnet => "subnet",
            Self::ElasticAddress => "elastic_address",
            Self::NatGateway => "nat_gateway",
            Self::RouteTable => "route_table",
            Self::RouteTableAssociation => "route_table_association",
        }
    }

    /// Prefix used for provider-assigned identifiers
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Network => "vpc",
            Self::InternetGateway => "igw",
            Self::Subnet => "subnet",
            Self::ElasticAddress => "eipalloc",
            Self::NatGateway => "nat",
            Self::RouteTable => "rtb",
            Self::RouteTableAssociation => "rtbassoc",
        }
    }

    /// Whether the provider accepts tags on this kind
    pub fn is_taggable(&self) -> bool {
        !matches!(self, Self::RouteTableAssociation)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a subnet in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetRole {
    /// Routes to the internet gateway; instances get public addresses
    Public,
    /// Routes to the zone's NAT gateway
    Private,
}

impl SubnetRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    /// Whether instances launched in the subnet receive a public IP
    pub fn assigns_public_ip(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Tag key load balancer controllers use to discover the subnet
    pub fn load_balancer_tag(&self) -> &'static str {
        match self {
            Self::Public => super::tags::ELB_ROLE_TAG,
            Self::Private => super::tags::INTERNAL_ELB_ROLE_TAG,
        }
    }
}

impl fmt::Display for SubnetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_are_unique() {
        let mut names: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ResourceKind::ALL.len());

        let mut prefixes: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.id_prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ResourceKind::NatGateway).unwrap();
        assert_eq!(json, "\"nat_gateway\"");
        assert_eq!(ResourceKind::NatGateway.to_string(), "nat_gateway");
    }

    #[test]
    fn test_subnet_roles() {
        assert!(SubnetRole::Public.assigns_public_ip());
        assert!(!SubnetRole::Private.assigns_public_ip());
        assert_eq!(SubnetRole::Public.load_balancer_tag(), "kubernetes.io/role/elb");
        assert_eq!(
            SubnetRole::Private.load_balancer_tag(),
            "kubernetes.io/role/internal-elb"
        );
    }

    #[test]
    fn test_only_associations_are_untagged() {
        let untagged: Vec<_> = ResourceKind::ALL
            .iter()
            .filter(|k| !k.is_taggable())
            .collect();
        assert_eq!(untagged, vec![&ResourceKind::RouteTableAssociation]);
    }
}
