// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Topology Domain Models
//!
//! Value objects and pure rules for describing a multi-zone network:
//! address blocks, zone derivation, naming and tagging conventions, and
//! the subnet address plan.
//!
//! # Value Objects with Invariants
//!
//! - [`Ipv4Cidr`] - IPv4 block with canonical network address
//! - [`DeploymentName`] - Naming prefix for every declared resource
//! - [`Region`] - Region code zones are derived from
//! - [`AvailabilityZone`] - Region + letter suffix, with its index
//! - [`SubnetLayout`] - Validated public/private address plan
//! - [`Tags`] - Ordered tag set
//!
//! # Vocabulary
//!
//! - [`ResourceKind`] - Kinds of resources a topology declares
//! - [`SubnetRole`] - Public or private subnet

pub mod invariants;
pub mod layout;
pub mod naming;
pub mod network;
pub mod resource_type;
pub mod tags;
pub mod zone;

pub use invariants::{ValidationError, ValidationResult};
pub use layout::{SubnetLayout, DEFAULT_NETWORK_CIDR, DEFAULT_SUBNET_PREFIX};
pub use naming::{DeploymentName, NamingError, Region};
pub use network::{Ipv4Cidr, NetworkError};
pub use resource_type::{ResourceKind, SubnetRole};
pub use tags::{Tags, ELB_ROLE_TAG, INTERNAL_ELB_ROLE_TAG, NAME_TAG};
pub use zone::{derive_zones, AvailabilityZone, MAX_ZONES};
