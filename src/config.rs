// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment and Topology Configuration
//!
//! [`DeploymentConfig`] is what an operator provides (environment or JSON
//! file). [`TopologyConfig`] is the validated input of the topology builder
//! and only exists for deployments that need a cloud network.
//!
//! # Environment
//!
//! | Variable                 | Meaning                        | Default        |
//! |--------------------------|--------------------------------|----------------|
//! | `CLUSTER_TYPE`           | `local` or `aws`               | required       |
//! | `CLUSTER_NAME`           | deployment name                | required       |
//! | `AWS_REGION`             | region code                    | required (aws) |
//! | `TOPOLOGY_ZONE_COUNT`    | number of availability zones   | `3`            |
//! | `TOPOLOGY_NETWORK_CIDR`  | network block                  | `10.0.0.0/16`  |
//! | `TOPOLOGY_SUBNET_PREFIX` | subnet prefix length           | `20`           |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::domain::{
    DeploymentName, Ipv4Cidr, Region, DEFAULT_NETWORK_CIDR, DEFAULT_SUBNET_PREFIX,
};
use crate::errors::{TopologyError, TopologyResult};

/// Default number of availability zones
pub const DEFAULT_ZONE_COUNT: usize = 3;

/// Where the Kubernetes control plane runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterType {
    /// Local cluster on the host network (kind)
    Local,
    /// Managed cluster in a dedicated cloud network
    Aws,
}

impl ClusterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Aws => "aws",
        }
    }
}

impl fmt::Display for ClusterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterType {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "aws" => Ok(Self::Aws),
            other => Err(TopologyError::Configuration(format!(
                "unsupported cluster type: {}",
                other
            ))),
        }
    }
}

fn default_zone_count() -> usize {
    DEFAULT_ZONE_COUNT
}

fn default_network_cidr() -> String {
    DEFAULT_NETWORK_CIDR.to_string()
}

fn default_subnet_prefix() -> u8 {
    DEFAULT_SUBNET_PREFIX
}

/// Operator-facing deployment configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub cluster_type: ClusterType,
    pub cluster_name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default = "default_zone_count")]
    pub zone_count: usize,
    #[serde(default = "default_network_cidr")]
    pub network_cidr: String,
    #[serde(default = "default_subnet_prefix")]
    pub subnet_prefix: u8,
}

impl DeploymentConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> TopologyResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> TopologyResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cluster_type = lookup("CLUSTER_TYPE")
            .ok_or_else(|| TopologyError::Configuration("CLUSTER_TYPE not set".to_string()))?
            .parse()?;

        let cluster_name = lookup("CLUSTER_NAME")
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| TopologyError::Configuration("CLUSTER_NAME not set".to_string()))?;

        let zone_count = match lookup("TOPOLOGY_ZONE_COUNT") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                TopologyError::Configuration(format!("invalid TOPOLOGY_ZONE_COUNT: {}", raw))
            })?,
            None => DEFAULT_ZONE_COUNT,
        };

        let subnet_prefix = match lookup("TOPOLOGY_SUBNET_PREFIX") {
            Some(raw) => raw.trim().trim_start_matches('/').parse().map_err(|_| {
                TopologyError::Configuration(format!("invalid TOPOLOGY_SUBNET_PREFIX: {}", raw))
            })?,
            None => DEFAULT_SUBNET_PREFIX,
        };

        Ok(Self {
            cluster_type,
            cluster_name,
            region: lookup("AWS_REGION"),
            zone_count,
            network_cidr: lookup("TOPOLOGY_NETWORK_CIDR").unwrap_or_else(default_network_cidr),
            subnet_prefix,
        })
    }

    /// Parse configuration from JSON
    pub fn from_json(json: &str) -> TopologyResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TopologyError::Configuration(format!("invalid configuration: {}", e)))
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> TopologyResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TopologyError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Local clusters run on the host network and get no topology
    pub fn requires_network_topology(&self) -> bool {
        matches!(self.cluster_type, ClusterType::Aws)
    }

    /// Validated builder input for cloud deployments
    pub fn topology_config(&self) -> TopologyResult<TopologyConfig> {
        if !self.requires_network_topology() {
            return Err(TopologyError::Configuration(format!(
                "{} clusters do not use a network topology",
                self.cluster_type
            )));
        }

        let region = self.region.as_deref().ok_or_else(|| {
            TopologyError::Configuration("AWS_REGION not set".to_string())
        })?;

        Ok(TopologyConfig {
            deployment_name: DeploymentName::new(self.cluster_name.trim())?,
            region: Region::new(region.trim())?,
            zone_count: self.zone_count,
            network_cidr: self.network_cidr.trim().parse()?,
            subnet_prefix: self.subnet_prefix,
        })
    }
}

/// Input of the network topology builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    pub deployment_name: DeploymentName,
    pub region: Region,
    pub zone_count: usize,
    pub network_cidr: Ipv4Cidr,
    pub subnet_prefix: u8,
}

impl TopologyConfig {
    /// Defaults: 3 zones, `10.0.0.0/16`, `/20` subnets
    pub fn new(deployment_name: DeploymentName, region: Region) -> Self {
        Self {
            deployment_name,
            region,
            zone_count: DEFAULT_ZONE_COUNT,
            network_cidr: DEFAULT_NETWORK_CIDR,
            subnet_prefix: DEFAULT_SUBNET_PREFIX,
        }
    }

    /// Validate raw strings into a config with defaults
    pub fn parse(deployment_name: &str, region: &str) -> TopologyResult<Self> {
        Ok(Self::new(
            DeploymentName::new(deployment_name)?,
            Region::new(region)?,
        ))
    }

    pub fn with_zone_count(mut self, zone_count: usize) -> Self {
        self.zone_count = zone_count;
        self
    }

    pub fn with_network_cidr(mut self, network_cidr: Ipv4Cidr) -> Self {
        self.network_cidr = network_cidr;
        self
    }

    pub fn with_subnet_prefix(mut self, subnet_prefix: u8) -> Self {
        self.subnet_prefix = subnet_prefix;
        self
    }
}
