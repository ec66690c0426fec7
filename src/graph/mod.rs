// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Dependency Graph
//!
//! A topology is planned as a directed acyclic graph of resource intents.
//! Edges point from a resource to the resources it references ("depends
//! on"). The graph is append-only and a node may only reference nodes that
//! were added before it, so it is acyclic by construction.
//!
//! # Orders
//!
//! ```text
//! creation_order()  network → igw → subnets → eips → nat → rtb → rtbassoc
//! teardown_order()  the exact reverse
//! creation_waves()  nodes grouped by depth; a wave only depends on
//!                   earlier waves, so its members may be created in parallel
//! ```
//!
//! Creation order is a topological order that breaks ties by insertion
//! order, which makes it identical to insertion order for graphs built in
//! dependency order and deterministic for all others.

pub mod spec;

pub use spec::{ResourceId, ResourceSpec, Route, RouteTarget};

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::domain::ResourceKind;

/// Graph construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Same logical id added twice
    #[error("Resource '{0}' is already part of the plan")]
    DuplicateResource(ResourceId),

    /// Reference to a resource that has not been added
    #[error("Resource '{resource}' depends on unknown resource '{dependency}'")]
    UnknownDependency {
        resource: ResourceId,
        dependency: ResourceId,
    },
}

/// One planned resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceNode {
    pub id: ResourceId,
    pub spec: ResourceSpec,
    pub depends_on: Vec<ResourceId>,
}

impl ResourceNode {
    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// Append-only DAG of resource intents
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    #[serde(skip)]
    index: HashMap<ResourceId, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; its dependencies are the references in `spec`
    pub fn add(&mut self, id: ResourceId, spec: ResourceSpec) -> Result<&ResourceId, GraphError> {
        if self.index.contains_key(&id) {
            return Err(GraphError::DuplicateResource(id));
        }

        let mut depends_on: Vec<ResourceId> = Vec::new();
        for dependency in spec.references() {
            if !self.index.contains_key(dependency) {
                return Err(GraphError::UnknownDependency {
                    resource: id,
                    dependency: dependency.clone(),
                });
            }
            if !depends_on.contains(dependency) {
                depends_on.push(dependency.clone());
            }
        }

        let position = self.nodes.len();
        self.index.insert(id.clone(), position);
        self.nodes.push(ResourceNode {
            id,
            spec,
            depends_on,
        });

        Ok(&self.nodes[position].id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &ResourceId) -> Option<&ResourceNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.index.contains_key(id)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    /// Nodes of one kind, in insertion order
    pub fn nodes_of_kind(&self, kind: ResourceKind) -> impl Iterator<Item = &ResourceNode> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    /// Nodes that reference `id` directly
    pub fn dependents(&self, id: &ResourceId) -> Vec<&ResourceNode> {
        self.nodes
            .iter()
            .filter(|n| n.depends_on.contains(id))
            .collect()
    }

    /// Topological order, ties broken by insertion order
    pub fn creation_order(&self) -> Vec<&ResourceNode> {
        let mut remaining: Vec<usize> = self.nodes.iter().map(|n| n.depends_on.len()).collect();
        let mut ready: BTreeSet<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, &count)| count == 0)
            .map(|(i, _)| i)
            .collect();

        let dependents = self.dependent_positions();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(next) = ready.pop_first() {
            order.push(&self.nodes[next]);
            for &dependent in &dependents[next] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        order
    }

    /// Reverse of the creation order: dependents before their dependencies
    pub fn teardown_order(&self) -> Vec<&ResourceNode> {
        let mut order = self.creation_order();
        order.reverse();
        order
    }

    /// Nodes grouped by dependency depth
    ///
    /// Wave 0 holds nodes without dependencies; wave `n` holds nodes whose
    /// deepest dependency sits in wave `n - 1`.
    pub fn creation_waves(&self) -> Vec<Vec<&ResourceNode>> {
        let mut depth: Vec<usize> = Vec::with_capacity(self.nodes.len());
        let mut waves: Vec<Vec<&ResourceNode>> = Vec::new();

        // Dependencies always precede dependents in `nodes`
        for node in &self.nodes {
            let level = node
                .depends_on
                .iter()
                .filter_map(|d| self.index.get(d))
                .map(|&i| depth[i] + 1)
                .max()
                .unwrap_or(0);
            depth.push(level);

            if waves.len() <= level {
                waves.resize_with(level + 1, Vec::new);
            }
            waves[level].push(node);
        }

        waves
    }

    fn dependent_positions(&self) -> Vec<Vec<usize>> {
        let mut dependents = vec![Vec::new(); self.nodes.len()];
        for (position, node) in self.nodes.iter().enumerate() {
            for dependency in &node.depends_on {
                if let Some(&i) = self.index.get(dependency) {
                    dependents[i].push(position);
                }
            }
        }
        dependents
    }
}
