// Copyright (c) 2025 - Cowboy AI, Inc.
//! Multi-AZ network topology for CIM clusters
//!
//! This crate plans the network a managed Kubernetes cluster runs in and
//! declares it to a provisioning engine: the address plan, gateways, NAT
//! egress and route tables of one isolated network per deployment.
//!
//! # Modules
//!
//! - [`config`] - deployment and topology configuration
//! - [`domain`] - value objects and pure invariants
//! - [`graph`] - dependency graph of resource intents
//! - [`provider`] - narrow interface to the provisioning engine
//! - [`state_machine`] - declaration lifecycle
//! - [`topology`] - planning, verification and provisioning

pub mod config;
pub mod domain;
pub mod errors;
pub mod graph;
pub mod provider;
pub mod state_machine;
pub mod topology;

// Re-export commonly used types
pub use config::{ClusterType, DeploymentConfig, TopologyConfig};
pub use errors::{TopologyError, TopologyResult};
pub use provider::{InMemoryProvider, ResourceHandle, ResourceProvider};
pub use topology::{plan_topology, NetworkTopology, NetworkTopologyBuilder, TopologyPlan};
