// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Provisioning Engine
//!
//! Deterministic stand-in for a cloud engine. It enforces the checks a real
//! engine would (name collisions, dangling references, subnet addressing,
//! quotas) and supports injected failures, which makes it usable both as a
//! local dry-run planner and as a test double.
//!
//! Handle ids are `<prefix>-<counter>` with one counter per kind, so two
//! fresh providers fed the same declarations hand out the same ids.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{Declaration, ProviderError, ResourceHandle, ResourceProvider};
use crate::domain::{Ipv4Cidr, ResourceKind};
use crate::graph::{ResourceSpec, RouteTarget};

#[derive(Debug, Default)]
struct EngineState {
    counters: HashMap<ResourceKind, u64>,
    by_name: HashMap<String, ResourceHandle>,
    kinds: HashMap<String, ResourceKind>,
    network_cidrs: HashMap<String, Ipv4Cidr>,
    subnet_cidrs: HashMap<String, Vec<Ipv4Cidr>>,
    accepted: Vec<Declaration>,
    attempts: Vec<String>,
}

/// In-memory provider with fault injection
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    failures: HashMap<(ResourceKind, String), String>,
    quotas: HashMap<ResourceKind, usize>,
    state: Mutex<EngineState>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the declaration of `kind` named `name` with `reason`
    pub fn fail_on(
        mut self,
        kind: ResourceKind,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.failures.insert((kind, name.into()), reason.into());
        self
    }

    /// Allow at most `limit` resources of `kind`
    pub fn with_quota(mut self, kind: ResourceKind, limit: usize) -> Self {
        self.quotas.insert(kind, limit);
        self
    }

    /// Declarations the engine accepted, in arrival order
    pub async fn declarations(&self) -> Vec<Declaration> {
        self.state.lock().await.accepted.clone()
    }

    /// Names of every declaration received, accepted or not
    pub async fn attempts(&self) -> Vec<String> {
        self.state.lock().await.attempts.clone()
    }

    /// Handle of an accepted resource by name
    pub async fn lookup(&self, name: &str) -> Option<ResourceHandle> {
        self.state.lock().await.by_name.get(name).cloned()
    }

    /// Number of accepted resources of `kind`
    pub async fn count(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .await
            .accepted
            .iter()
            .filter(|d| d.kind() == kind)
            .count()
    }

    fn check_references(
        state: &EngineState,
        spec: &ResourceSpec<ResourceHandle>,
    ) -> Result<(), ProviderError> {
        for (handle, expected) in expected_references(spec) {
            let known = state.kinds.get(&handle.id);
            if handle.kind != expected || known != Some(&expected) {
                return Err(ProviderError::UnknownReference {
                    expected,
                    reference: handle.id.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_subnet(
        state: &EngineState,
        network: &ResourceHandle,
        cidr: &Ipv4Cidr,
    ) -> Result<(), ProviderError> {
        let network_cidr = state.network_cidrs.get(&network.id).ok_or_else(|| {
            ProviderError::UnknownReference {
                expected: ResourceKind::Network,
                reference: network.id.clone(),
            }
        })?;

        if !network_cidr.contains(cidr) {
            return Err(ProviderError::InvalidParameter(format!(
                "subnet {} is outside network {}",
                cidr, network_cidr
            )));
        }

        let siblings = state.subnet_cidrs.get(&network.id);
        if let Some(existing) = siblings.and_then(|s| s.iter().find(|e| e.overlaps(cidr))) {
            return Err(ProviderError::InvalidParameter(format!(
                "subnet {} conflicts with existing subnet {}",
                cidr, existing
            )));
        }

        Ok(())
    }
}

/// References carried by `spec` and the kind each must point to
fn expected_references(
    spec: &ResourceSpec<ResourceHandle>,
) -> Vec<(&ResourceHandle, ResourceKind)> {
    match spec {
        ResourceSpec::Network { .. } | ResourceSpec::ElasticAddress { .. } => Vec::new(),
        ResourceSpec::InternetGateway { network, .. } | ResourceSpec::Subnet { network, .. } => {
            vec![(network, ResourceKind::Network)]
        }
        ResourceSpec::NatGateway {
            subnet, allocation, ..
        } => vec![
            (subnet, ResourceKind::Subnet),
            (allocation, ResourceKind::ElasticAddress),
        ],
        ResourceSpec::RouteTable {
            network, routes, ..
        } => {
            let mut refs = vec![(network, ResourceKind::Network)];
            refs.extend(routes.iter().map(|route| match &route.target {
                RouteTarget::InternetGateway(h) => (h, ResourceKind::InternetGateway),
                RouteTarget::NatGateway(h) => (h, ResourceKind::NatGateway),
            }));
            refs
        }
        ResourceSpec::RouteTableAssociation {
            subnet,
            route_table,
        } => vec![
            (subnet, ResourceKind::Subnet),
            (route_table, ResourceKind::RouteTable),
        ],
    }
}

#[async_trait]
impl ResourceProvider for InMemoryProvider {
    async fn declare(&self, declaration: &Declaration) -> Result<ResourceHandle, ProviderError> {
        let kind = declaration.kind();
        let mut state = self.state.lock().await;
        state.attempts.push(declaration.name.clone());

        if let Some(reason) = self.failures.get(&(kind, declaration.name.clone())) {
            warn!(kind = %kind, name = %declaration.name, "Injected failure");
            return Err(ProviderError::Rejected(reason.clone()));
        }

        if state.by_name.contains_key(&declaration.name) {
            return Err(ProviderError::NameCollision {
                kind,
                name: declaration.name.clone(),
            });
        }

        Self::check_references(&state, &declaration.spec)?;

        if let Some(&limit) = self.quotas.get(&kind) {
            let used = state.accepted.iter().filter(|d| d.kind() == kind).count();
            if used >= limit {
                return Err(ProviderError::QuotaExceeded { kind, limit });
            }
        }

        if let ResourceSpec::Subnet { network, cidr, .. } = &declaration.spec {
            Self::check_subnet(&state, network, cidr)?;
        }

        let counter = state.counters.entry(kind).or_insert(0);
        *counter += 1;
        let handle = ResourceHandle::new(kind, format!("{}-{:08x}", kind.id_prefix(), counter));

        match &declaration.spec {
            ResourceSpec::Network { cidr, .. } => {
                state.network_cidrs.insert(handle.id.clone(), *cidr);
            }
            ResourceSpec::Subnet { network, cidr, .. } => {
                state
                    .subnet_cidrs
                    .entry(network.id.clone())
                    .or_default()
                    .push(*cidr);
            }
            _ => {}
        }

        state.kinds.insert(handle.id.clone(), kind);
        state
            .by_name
            .insert(declaration.name.clone(), handle.clone());
        state.accepted.push(declaration.clone());

        debug!(kind = %kind, name = %declaration.name, id = %handle.id, "Declared resource");
        Ok(handle)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}
