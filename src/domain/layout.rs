// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Address Plan
//!
//! Splits the network block in two halves: public subnets are carved from
//! the lower half, private subnets from the upper half, one block per zone
//! in zone order. With the default `10.0.0.0/16` and `/20` blocks this
//! yields `10.0.<16i>.0/20` (public) and `10.0.<128+16i>.0/20` (private).

use serde::Serialize;
use std::net::Ipv4Addr;

use super::invariants::{self, ValidationError};
use super::network::Ipv4Cidr;
use super::resource_type::SubnetRole;

/// Default network block, `10.0.0.0/16`
pub const DEFAULT_NETWORK_CIDR: Ipv4Cidr = Ipv4Cidr::aligned(Ipv4Addr::new(10, 0, 0, 0), 16);

/// Default subnet size (4096 addresses)
pub const DEFAULT_SUBNET_PREFIX: u8 = 20;

/// Validated address plan for a fixed number of zones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubnetLayout {
    network: Ipv4Cidr,
    public_half: Ipv4Cidr,
    private_half: Ipv4Cidr,
    subnet_prefix: u8,
    zone_count: usize,
}

impl SubnetLayout {
    /// Build a layout, checking zone count and capacity up front
    pub fn new(
        network: Ipv4Cidr,
        subnet_prefix: u8,
        zone_count: usize,
    ) -> Result<Self, ValidationError> {
        invariants::validate_zone_count(zone_count)?;
        invariants::validate_capacity(&network, subnet_prefix, zone_count)?;

        // validate_capacity guarantees prefix < subnet_prefix <= 32
        let (public_half, private_half) = network
            .halves()
            .map_err(|_| ValidationError::SubnetPrefixTooWide {
                subnet_prefix,
                network,
            })?;

        Ok(Self {
            network,
            public_half,
            private_half,
            subnet_prefix,
            zone_count,
        })
    }

    pub fn network(&self) -> Ipv4Cidr {
        self.network
    }

    pub fn subnet_prefix(&self) -> u8 {
        self.subnet_prefix
    }

    pub fn zone_count(&self) -> usize {
        self.zone_count
    }

    /// CIDR of the subnet with `role` in zone `zone_index`
    ///
    /// Returns `None` for indices outside the layout's zone count.
    pub fn subnet_cidr(&self, role: SubnetRole, zone_index: usize) -> Option<Ipv4Cidr> {
        if zone_index >= self.zone_count {
            return None;
        }

        let half = match role {
            SubnetRole::Public => self.public_half,
            SubnetRole::Private => self.private_half,
        };

        half.nth_subnet(self.subnet_prefix, u32::try_from(zone_index).ok()?)
            .ok()
    }

    /// Every subnet CIDR in the layout, public first, zone order within
    pub fn all_subnets(&self) -> Vec<Ipv4Cidr> {
        [SubnetRole::Public, SubnetRole::Private]
            .into_iter()
            .flat_map(|role| (0..self.zone_count).filter_map(move |i| self.subnet_cidr(role, i)))
            .collect()
    }
}
