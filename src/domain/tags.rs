// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Tags

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag carrying the resource's display name
pub const NAME_TAG: &str = "Name";

/// Marks subnets for internet-facing load balancers
pub const ELB_ROLE_TAG: &str = "kubernetes.io/role/elb";

/// Marks subnets for internal load balancers
pub const INTERNAL_ELB_ROLE_TAG: &str = "kubernetes.io/role/internal-elb";

/// Ordered tag set
///
/// Backed by a `BTreeMap` so iteration and serialization are stable across
/// runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags with only `Name` set
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().with(NAME_TAG, name)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(NAME_TAG)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_ordered() {
        let tags = Tags::named("demo-public-us-east-1a").with(ELB_ROLE_TAG, "1");
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Name", "kubernetes.io/role/elb"]);
        assert_eq!(tags.name(), Some("demo-public-us-east-1a"));
        assert_eq!(tags.get(ELB_ROLE_TAG), Some("1"));
        assert!(!tags.contains_key(INTERNAL_ELB_ROLE_TAG));
    }

    #[test]
    fn test_tags_serialize_as_map() {
        let tags = Tags::named("demo");
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"{"Name":"demo"}"#);
    }
}
