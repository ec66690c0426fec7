// Copyright (c) 2025 - Cowboy AI, Inc.
//! Availability Zone Derivation
//!
//! Zones are derived from the region code by appending a letter suffix
//! (`us-east-1` → `us-east-1a`, `us-east-1b`, ...). The position of a zone in
//! the derived list is its index; the index drives both CIDR offsets and
//! resource naming, so the list order is part of the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::naming::Region;

/// Letter suffixes available for zones
pub const ZONE_SUFFIXES: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Highest number of zones that can be named from one region
pub const MAX_ZONES: usize = ZONE_SUFFIXES.len();

/// One availability zone within a region
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailabilityZone {
    name: String,
    index: usize,
}

impl AvailabilityZone {
    /// Zone name, e.g. `us-east-1b`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in declaration order
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Derive `count` zones for `region`, in suffix order
///
/// Returns `None` when `count` exceeds [`MAX_ZONES`].
pub fn derive_zones(region: &Region, count: usize) -> Option<Vec<AvailabilityZone>> {
    if count > MAX_ZONES {
        return None;
    }

    let zones = ZONE_SUFFIXES[..count]
        .iter()
        .enumerate()
        .map(|(index, suffix)| AvailabilityZone {
            name: format!("{}{}", region, *suffix as char),
            index,
        })
        .collect();

    Some(zones)
}
