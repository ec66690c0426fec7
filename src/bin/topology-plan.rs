// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Planner
//!
//! Reads the deployment configuration and prints the network topology plan
//! as JSON. With `--apply` the plan is provisioned against the in-memory
//! engine and the resulting topology descriptor is printed instead.
//!
//! Run with: cargo run --bin topology-plan -- [--config <file>] [--apply]
//!
//! Without `--config`, configuration comes from the environment:
//! `CLUSTER_TYPE`, `CLUSTER_NAME`, `AWS_REGION` and the optional
//! `TOPOLOGY_ZONE_COUNT`, `TOPOLOGY_NETWORK_CIDR`, `TOPOLOGY_SUBNET_PREFIX`.

use anyhow::{bail, Context, Result};
use cim_network_topology::{
    plan_topology, DeploymentConfig, InMemoryProvider, NetworkTopologyBuilder,
};
use std::path::PathBuf;
use tracing::{info, warn};

const USAGE: &str = "usage: topology-plan [--config <file>] [--apply]";

/// Command line options
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    apply: bool,
}

impl Options {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut options = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().context("--config requires a file path")?;
                    options.config = Some(PathBuf::from(path));
                }
                "--apply" => options.apply = true,
                "--help" | "-h" => {
                    println!("{}", USAGE);
                    std::process::exit(0);
                }
                other => bail!("unknown argument '{}'\n{}", other, USAGE),
            }
        }

        Ok(options)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = Options::parse(std::env::args().skip(1))?;

    let deployment = match &options.config {
        Some(path) => DeploymentConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => DeploymentConfig::from_env().context("Failed to load configuration from env")?,
    };

    info!(
        cluster_type = %deployment.cluster_type,
        cluster_name = %deployment.cluster_name,
        "📋 Configuration loaded"
    );

    if !deployment.requires_network_topology() {
        warn!("Local cluster uses the host network");
        println!("local cluster: no network topology");
        return Ok(());
    }

    let config = deployment
        .topology_config()
        .context("Invalid topology configuration")?;

    if !options.apply {
        let plan = plan_topology(&config).context("Failed to plan network topology")?;
        println!("{}", plan.to_json()?);
        return Ok(());
    }

    let mut builder = NetworkTopologyBuilder::new(config, InMemoryProvider::new());
    let topology = builder
        .provision()
        .await
        .context("Failed to provision network topology")?;

    if let Some(report) = builder.last_report() {
        info!(
            correlation_id = %report.correlation_id,
            declared = report.records().len(),
            "📊 Provisioning report complete"
        );
    }

    println!("{}", topology.to_json()?);
    Ok(())
}
