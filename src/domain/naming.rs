// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Name and Region Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Naming validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("Deployment name is empty")]
    EmptyName,

    #[error("Deployment name exceeds maximum length of {max} characters: {len}")]
    NameTooLong { len: usize, max: usize },

    #[error("Invalid character in deployment name: {0:?}")]
    InvalidCharacter(char),

    #[error("Deployment name must start with a letter and not end with a hyphen: {0}")]
    InvalidNameFormat(String),

    #[error("Region is empty")]
    EmptyRegion,

    #[error("Invalid region code: {0}")]
    InvalidRegion(String),
}

/// Deployment name, used as the naming prefix of every declared resource
///
/// Invariants:
/// - 1 to 48 characters
/// - Lowercase ASCII letters, digits and hyphens only
/// - Starts with a letter, does not end with a hyphen
///
/// # Examples
///
/// ```rust
/// use cim_network_topology::domain::DeploymentName;
///
/// let name = DeploymentName::new("prod-cluster").unwrap();
/// assert_eq!(name.resource_name("igw"), "prod-cluster-igw");
///
/// assert!(DeploymentName::new("").is_err());
/// assert!(DeploymentName::new("Prod").is_err());
/// assert!(DeploymentName::new("1cluster").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentName(String);

impl DeploymentName {
    pub const MAX_LENGTH: usize = 48;

    pub fn new(name: impl Into<String>) -> Result<Self, NamingError> {
        let name = name.into();

        if name.is_empty() {
            return Err(NamingError::EmptyName);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(NamingError::NameTooLong {
                len: name.len(),
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(ch) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(NamingError::InvalidCharacter(ch));
        }

        let starts_with_letter = name.starts_with(|c: char| c.is_ascii_lowercase());
        if !starts_with_letter || name.ends_with('-') {
            return Err(NamingError::InvalidNameFormat(name));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<deployment>-<suffix>`
    pub fn resource_name(&self, suffix: impl fmt::Display) -> String {
        format!("{}-{}", self.0, suffix)
    }
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeploymentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeploymentName {
    type Error = NamingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DeploymentName {
    type Error = NamingError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DeploymentName> for String {
    fn from(name: DeploymentName) -> Self {
        name.0
    }
}

/// Cloud region code such as `us-east-1`
///
/// Only the shape is checked: lowercase letters, digits and hyphens, at
/// least one hyphen, ending in a digit. Whether the region (or its zones)
/// exists is left to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    pub fn new(code: impl Into<String>) -> Result<Self, NamingError> {
        let code = code.into();

        if code.is_empty() {
            return Err(NamingError::EmptyRegion);
        }

        let valid_chars = code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        let shaped = code.contains('-')
            && code.starts_with(|c: char| c.is_ascii_lowercase())
            && code.ends_with(|c: char| c.is_ascii_digit())
            && !code.contains("--");

        if !valid_chars || !shaped {
            return Err(NamingError::InvalidRegion(code));
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Region {
    type Error = NamingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}
