// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Topology Invariants
//!
//! Business rules a network topology must satisfy before anything is
//! declared to a provider. All functions are pure and deterministic.
//!
//! # Invariant Categories
//!
//! 1. **Capacity**: the zone count fits the address plan
//! 2. **Addressing**: subnets sit inside the network and never overlap
//! 3. **Routing**: every subnet has exactly one route table, public tables
//!    egress through the internet gateway, private tables through a
//!    same-zone NAT gateway (checked over a plan in `topology::verify`)

use crate::domain::network::Ipv4Cidr;
use crate::domain::zone::MAX_ZONES;

/// Validation result with detailed error information
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error with context
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Zone count is zero or cannot be named from one region
    #[error("Zone count {count} is out of range (must be 1-{max})")]
    ZoneCountOutOfRange { count: usize, max: usize },

    /// Subnet size is not strictly smaller than half the network
    #[error("Subnet prefix /{subnet_prefix} does not fit twice in {network}")]
    SubnetPrefixTooWide { subnet_prefix: u8, network: Ipv4Cidr },

    /// Subnet prefix longer than an IPv4 address
    #[error("Subnet prefix /{0} is longer than 32 bits")]
    SubnetPrefixTooLong(u8),

    /// Zones would need more address space than the network holds
    #[error(
        "{zones} zones of /{subnet_prefix} subnets exceed {network} (at most {max_zones} zones fit)"
    )]
    CapacityExceeded {
        zones: usize,
        subnet_prefix: u8,
        network: Ipv4Cidr,
        max_zones: u64,
    },

    /// Subnet block lies (partly) outside the network block
    #[error("Subnet {subnet} is outside network {network}")]
    SubnetOutsideNetwork { subnet: Ipv4Cidr, network: Ipv4Cidr },

    /// Two subnets share addresses
    #[error("Subnets {first} and {second} overlap")]
    OverlappingSubnets { first: Ipv4Cidr, second: Ipv4Cidr },

    /// Subnet without a route table association
    #[error("Subnet '{0}' has no route table association")]
    MissingAssociation(String),

    /// Subnet bound to more than one route table
    #[error("Subnet '{subnet}' has {count} route table associations")]
    MultipleAssociations { subnet: String, count: usize },

    /// Route table whose default route goes somewhere it must not
    #[error("Route table '{route_table}' for subnet '{subnet}' has an invalid default route: {reason}")]
    InvalidEgress {
        route_table: String,
        subnet: String,
        reason: String,
    },

    /// Private route table or NAT gateway shared between zones
    #[error("'{resource}' serves more than one zone")]
    CrossZoneSharing { resource: String },
}

/// Validate the zone count can be named and is non-zero
///
/// # Rules
/// - At least one zone
/// - At most one zone per suffix letter
pub fn validate_zone_count(count: usize) -> ValidationResult {
    if count == 0 || count > MAX_ZONES {
        return Err(ValidationError::ZoneCountOutOfRange {
            count,
            max: MAX_ZONES,
        });
    }
    Ok(())
}

/// Validate `zones` public and `zones` private subnets fit in the network
///
/// # Rules
/// - Public subnets use the lower half of the network, private the upper
///   half, so each half must hold `zones` blocks of `/subnet_prefix`
/// - `zones * block_size <= network_size / 2`
///
/// Returns the maximum zone count the layout supports.
pub fn validate_capacity(
    network: &Ipv4Cidr,
    subnet_prefix: u8,
    zones: usize,
) -> Result<u64, ValidationError> {
    if subnet_prefix > Ipv4Cidr::MAX_PREFIX {
        return Err(ValidationError::SubnetPrefixTooLong(subnet_prefix));
    }

    if subnet_prefix <= network.prefix_length() {
        return Err(ValidationError::SubnetPrefixTooWide {
            subnet_prefix,
            network: *network,
        });
    }

    let block_size = 1u64 << (Ipv4Cidr::MAX_PREFIX - subnet_prefix);
    let half = network.size() / 2;
    let max_zones = half / block_size;

    if (zones as u64).saturating_mul(block_size) > half {
        return Err(ValidationError::CapacityExceeded {
            zones,
            subnet_prefix,
            network: *network,
            max_zones,
        });
    }

    Ok(max_zones)
}

/// Validate every subnet lies inside the network
pub fn validate_subnets_within(network: &Ipv4Cidr, subnets: &[Ipv4Cidr]) -> ValidationResult {
    match subnets.iter().find(|s| !network.contains(s)) {
        Some(subnet) => Err(ValidationError::SubnetOutsideNetwork {
            subnet: *subnet,
            network: *network,
        }),
        None => Ok(()),
    }
}

/// Validate no two subnets overlap
pub fn validate_subnets_disjoint(subnets: &[Ipv4Cidr]) -> ValidationResult {
    for (i, first) in subnets.iter().enumerate() {
        if let Some(second) = subnets[i + 1..].iter().find(|s| first.overlaps(s)) {
            return Err(ValidationError::OverlappingSubnets {
                first: *first,
                second: *second,
            });
        }
    }
    Ok(())
}
