// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4)")]
    InvalidPrefixLength(u8),

    #[error("Address {address} has host bits set for /{prefix_length}")]
    HostBitsSet { address: Ipv4Addr, prefix_length: u8 },

    #[error("Cannot split /{parent} into /{requested} blocks")]
    InvalidSplit { parent: u8, requested: u8 },

    #[error("Block index {index} is outside {parent} (holds {capacity} /{prefix_length} blocks)")]
    BlockOutOfRange {
        parent: Ipv4Cidr,
        prefix_length: u8,
        index: u32,
        capacity: u64,
    },
}

/// IPv4 address block in CIDR notation
///
/// Invariants:
/// - Prefix length 0-32
/// - Address is the network address of the block (no host bits set)
///
/// # Examples
///
/// ```rust
/// use cim_network_topology::domain::Ipv4Cidr;
///
/// let vpc: Ipv4Cidr = "10.0.0.0/16".parse().unwrap();
/// let subnet = vpc.nth_subnet(20, 1).unwrap();
/// assert_eq!(subnet.to_string(), "10.0.16.0/20");
/// assert!(vpc.contains(&subnet));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ipv4Cidr {
    address: Ipv4Addr,
    prefix_length: u8,
}

impl Ipv4Cidr {
    /// Maximum IPv4 prefix length
    pub const MAX_PREFIX: u8 = 32;

    /// The default route, `0.0.0.0/0`
    pub const DEFAULT_ROUTE: Ipv4Cidr = Ipv4Cidr::aligned(Ipv4Addr::UNSPECIFIED, 0);

    /// Block from an address already aligned to `prefix_length`, for constants
    pub(crate) const fn aligned(address: Ipv4Addr, prefix_length: u8) -> Self {
        Self {
            address,
            prefix_length,
        }
    }

    /// Create a block, rejecting addresses with host bits set
    pub fn new(address: Ipv4Addr, prefix_length: u8) -> Result<Self, NetworkError> {
        if prefix_length > Self::MAX_PREFIX {
            return Err(NetworkError::InvalidPrefixLength(prefix_length));
        }

        let bits = u32::from(address);
        if bits & !mask(prefix_length) != 0 {
            return Err(NetworkError::HostBitsSet {
                address,
                prefix_length,
            });
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// Network address of the block
    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Number of addresses in the block (2^(32 - prefix))
    pub fn size(&self) -> u64 {
        1u64 << (Self::MAX_PREFIX - self.prefix_length)
    }

    /// Last address of the block
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.address) | !mask(self.prefix_length))
    }

    /// True when `other` lies entirely inside this block
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_length >= self.prefix_length
            && u32::from(other.address) & mask(self.prefix_length) == u32::from(self.address)
    }

    /// True when the two blocks share at least one address
    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// How many `/prefix_length` blocks fit in this block
    pub fn subnet_capacity(&self, prefix_length: u8) -> Result<u64, NetworkError> {
        if prefix_length < self.prefix_length || prefix_length > Self::MAX_PREFIX {
            return Err(NetworkError::InvalidSplit {
                parent: self.prefix_length,
                requested: prefix_length,
            });
        }
        Ok(1u64 << (prefix_length - self.prefix_length))
    }

    /// The `index`-th `/prefix_length` block inside this block
    ///
    /// Offsets are computed on the full 32-bit address, so they carry into
    /// higher octets instead of wrapping.
    pub fn nth_subnet(&self, prefix_length: u8, index: u32) -> Result<Ipv4Cidr, NetworkError> {
        let capacity = self.subnet_capacity(prefix_length)?;
        if u64::from(index) >= capacity {
            return Err(NetworkError::BlockOutOfRange {
                parent: *self,
                prefix_length,
                index,
                capacity,
            });
        }

        let block_size = 1u64 << (Self::MAX_PREFIX - prefix_length);
        let offset = u64::from(index) * block_size;
        // offset < self.size(), so the sum stays inside the parent block
        let start = u64::from(u32::from(self.address)) + offset;

        Ipv4Cidr::new(Ipv4Addr::from(start as u32), prefix_length)
    }

    /// Split the block into its two halves
    pub fn halves(&self) -> Result<(Ipv4Cidr, Ipv4Cidr), NetworkError> {
        let child = self.prefix_length + 1;
        Ok((self.nth_subnet(child, 0)?, self.nth_subnet(child, 1)?))
    }
}

fn mask(prefix_length: u8) -> u32 {
    if prefix_length == 0 {
        0
    } else {
        u32::MAX << (Ipv4Cidr::MAX_PREFIX - prefix_length)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, prefix_str) = s
            .split_once('/')
            .ok_or_else(|| NetworkError::InvalidCidr(s.to_string()))?;

        let address = Ipv4Addr::from_str(addr_str)
            .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| NetworkError::InvalidCidr(s.to_string()))?;

        Self::new(address, prefix_length)
    }
}

impl Serialize for Ipv4Cidr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ipv4Cidr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cidr(s: &str) -> Ipv4Cidr {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let block = cidr("10.0.0.0/16");
        assert_eq!(block.address(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(block.prefix_length(), 16);
        assert_eq!(block.to_string(), "10.0.0.0/16");
        assert_eq!(block.size(), 65536);
        assert_eq!(block.broadcast(), Ipv4Addr::new(10, 0, 255, 255));
    }

    #[test]
    fn test_invalid_cidr() {
        assert!("10.0.0.0".parse::<Ipv4Cidr>().is_err()); // No prefix
        assert!("10.0.0.0/33".parse::<Ipv4Cidr>().is_err());
        assert!("999.0.0.0/8".parse::<Ipv4Cidr>().is_err());
        assert!("2001:db8::/32".parse::<Ipv4Cidr>().is_err()); // IPv6 not supported
        assert!(matches!(
            "10.0.0.1/16".parse::<Ipv4Cidr>(),
            Err(NetworkError::HostBitsSet { .. })
        ));
    }

    #[test]
    fn test_contains_and_overlaps() {
        let vpc = cidr("10.0.0.0/16");
        let a = cidr("10.0.0.0/20");
        let b = cidr("10.0.16.0/20");
        let outside = cidr("10.1.0.0/20");

        assert!(vpc.contains(&a));
        assert!(!a.contains(&vpc));
        assert!(!vpc.contains(&outside));
        assert!(!a.overlaps(&b));
        assert!(vpc.overlaps(&a));
        assert!(Ipv4Cidr::DEFAULT_ROUTE.contains(&vpc));
    }

    #[test]
    fn test_nth_subnet() {
        let vpc = cidr("10.0.0.0/16");
        assert_eq!(vpc.nth_subnet(20, 0).unwrap(), cidr("10.0.0.0/20"));
        assert_eq!(vpc.nth_subnet(20, 8).unwrap(), cidr("10.0.128.0/20"));
        assert_eq!(vpc.nth_subnet(20, 15).unwrap(), cidr("10.0.240.0/20"));
        assert!(matches!(
            vpc.nth_subnet(20, 16),
            Err(NetworkError::BlockOutOfRange { capacity: 16, .. })
        ));
        assert!(vpc.nth_subnet(8, 0).is_err());
    }

    #[test]
    fn test_nth_subnet_carries_into_next_octet() {
        let block = cidr("10.0.0.0/8");
        assert_eq!(block.nth_subnet(20, 16).unwrap(), cidr("10.1.0.0/20"));
    }

    #[test]
    fn test_halves() {
        let (low, high) = cidr("10.0.0.0/16").halves().unwrap();
        assert_eq!(low, cidr("10.0.0.0/17"));
        assert_eq!(high, cidr("10.0.128.0/17"));
        assert!(cidr("10.0.0.1/32").halves().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&cidr("10.0.128.0/20")).unwrap();
        assert_eq!(json, "\"10.0.128.0/20\"");
        let back: Ipv4Cidr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cidr("10.0.128.0/20"));
    }
}
