// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-Zone Network Topology
//!
//! Planning and provisioning of one isolated network per deployment:
//! an internet gateway, a public and a private subnet per availability
//! zone, a NAT gateway per zone, and route tables binding every subnet to
//! its egress path.
//!
//! # Flow
//!
//! ```text
//! TopologyConfig ──plan_topology()──→ TopologyPlan (ResourceGraph + layout)
//!                                          │ verify_plan()
//!                                          ↓
//! NetworkTopologyBuilder::provision() ──declare()──→ ResourceProvider
//!                                          │
//!                                          ↓
//!                          NetworkTopology + ProvisioningReport
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_network_topology::config::TopologyConfig;
//! use cim_network_topology::domain::SubnetRole;
//! use cim_network_topology::topology::plan_topology;
//!
//! let config = TopologyConfig::parse("demo", "us-east-1").unwrap();
//! let plan = plan_topology(&config).unwrap();
//!
//! let public: Vec<String> = plan
//!     .subnet_cidrs(SubnetRole::Public)
//!     .iter()
//!     .map(|c| c.to_string())
//!     .collect();
//! assert_eq!(public, ["10.0.0.0/20", "10.0.16.0/20", "10.0.32.0/20"]);
//! ```

pub mod builder;
pub mod descriptor;
pub mod report;
pub mod verify;

pub use builder::{plan_topology, NetworkTopologyBuilder};
pub use descriptor::{NetworkTopology, TopologyPlan, TopologyResources};
pub use report::{DeclarationRecord, ProvisioningReport};
pub use verify::verify_plan;
