// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for topology operations

use thiserror::Error;

use crate::domain::{NamingError, NetworkError, ResourceKind, ValidationError};
use crate::graph::GraphError;
use crate::provider::ProviderError;
use crate::state_machine::TransitionError;

/// Errors that can occur while planning or provisioning a topology
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The provider rejected a declaration; nothing after it was declared
    #[error("failed to declare {kind} '{name}': {source}")]
    Provisioning {
        kind: ResourceKind,
        name: String,
        #[source]
        source: ProviderError,
    },

    /// Unsupported or invalid input, detected before any declaration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Plan could not be assembled
    #[error("Plan error: {0}")]
    Plan(#[from] GraphError),

    /// Plan violates a topology invariant
    #[error("Invariant violated: {0}")]
    Invariant(#[from] ValidationError),

    /// Declaration lifecycle moved through an invalid transition
    #[error("Lifecycle error: {0}")]
    Lifecycle(#[from] TransitionError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TopologyError {
    /// True for errors raised by the provisioning engine
    pub fn is_provisioning(&self) -> bool {
        matches!(self, TopologyError::Provisioning { .. })
    }

    /// True for input errors raised before any declaration
    pub fn is_configuration(&self) -> bool {
        matches!(self, TopologyError::Configuration(_))
    }
}

/// Result type for topology operations
pub type TopologyResult<T> = Result<T, TopologyError>;

impl From<NamingError> for TopologyError {
    fn from(err: NamingError) -> Self {
        TopologyError::Configuration(err.to_string())
    }
}

impl From<NetworkError> for TopologyError {
    fn from(err: NetworkError) -> Self {
        TopologyError::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for TopologyError {
    fn from(err: serde_json::Error) -> Self {
        TopologyError::Serialization(err.to_string())
    }
}
