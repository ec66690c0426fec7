// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Engine Abstraction
//!
//! The topology core never creates network devices itself. It declares
//! resource intents to an external reconciliation engine through the
//! narrow [`ResourceProvider`] interface and receives opaque handles back.
//!
//! # Architecture
//!
//! ```text
//! ResourceGraph → NetworkTopologyBuilder → declare() → Provisioning Engine
//!                         ↑                                │
//!                         └──────── ResourceHandle ────────┘
//! ```
//!
//! # Provider Requirements
//!
//! 1. **Immediate failure**: a rejected declaration returns an error, it is
//!    never retried by the core
//! 2. **Resolved references**: declarations only reference handles the
//!    provider returned earlier
//! 3. **Ownership of teardown**: rollback of partially created resources is
//!    the engine's job

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::domain::ResourceKind;
use crate::graph::ResourceSpec;

pub mod memory;

pub use memory::InMemoryProvider;

/// Opaque reference to a resource created by a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub id: String,
}

impl ResourceHandle {
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A resource intent with every reference resolved to a provider handle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Unique resource name (the `Name` tag for taggable kinds)
    pub name: String,
    pub spec: ResourceSpec<ResourceHandle>,
}

impl Declaration {
    pub fn kind(&self) -> ResourceKind {
        self.spec.kind()
    }
}

/// Errors reported by a provisioning engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// A resource with the same name already exists
    #[error("{kind} named '{name}' already exists")]
    NameCollision { kind: ResourceKind, name: String },

    /// Declaration references a handle the engine does not know
    #[error("reference to unknown {expected} '{reference}'")]
    UnknownReference {
        expected: ResourceKind,
        reference: String,
    },

    /// Account limit for the resource kind reached
    #[error("quota exceeded for {kind} (limit {limit})")]
    QuotaExceeded { kind: ResourceKind, limit: usize },

    /// Parameter rejected by the engine
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Engine refused the declaration for its own reasons
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Narrow interface to a provisioning engine
///
/// Implementations must be safe to share between tasks; the builder calls
/// `declare` sequentially but may hold the provider behind an `Arc`.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Declare one resource and return its handle
    ///
    /// # Errors
    ///
    /// Any [`ProviderError`]; the caller aborts the whole topology on the
    /// first error.
    async fn declare(&self, declaration: &Declaration) -> Result<ResourceHandle, ProviderError>;

    /// Human-readable engine name for logs
    fn name(&self) -> &str {
        "provider"
    }
}

#[async_trait]
impl<P: ResourceProvider + ?Sized> ResourceProvider for Arc<P> {
    async fn declare(&self, declaration: &Declaration) -> Result<ResourceHandle, ProviderError> {
        (**self).declare(declaration).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_display_is_id() {
        let handle = ResourceHandle::new(ResourceKind::NatGateway, "nat-00000005");
        assert_eq!(handle.to_string(), "nat-00000005");
    }

    #[test]
    fn test_provider_error_messages() {
        let err = ProviderError::NameCollision {
            kind: ResourceKind::Subnet,
            name: "demo-public-us-east-1a".into(),
        };
        assert_eq!(
            err.to_string(),
            "subnet named 'demo-public-us-east-1a' already exists"
        );

        let err = ProviderError::QuotaExceeded {
            kind: ResourceKind::ElasticAddress,
            limit: 5,
        };
        assert_eq!(err.to_string(), "quota exceeded for elastic_address (limit 5)");
    }

    #[test]
    fn test_shared_provider_declares_through_arc() {
        use crate::domain::Tags;

        let provider = Arc::new(InMemoryProvider::new());
        let shared: &dyn ResourceProvider = &provider;
        let declaration = Declaration {
            name: "demo-eip-us-east-1a".into(),
            spec: ResourceSpec::ElasticAddress {
                availability_zone: "us-east-1a".into(),
                tags: Tags::named("demo-eip-us-east-1a"),
            },
        };

        let handle = tokio_test::block_on(shared.declare(&declaration)).unwrap();
        assert_eq!(handle.id, "eipalloc-00000001");
        assert_eq!(
            tokio_test::block_on(provider.lookup("demo-eip-us-east-1a")),
            Some(handle)
        );
    }
}
