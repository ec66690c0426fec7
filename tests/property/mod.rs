// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! - `addressing`: CIDR arithmetic and subnet layouts
//! - `planning`: structure and determinism of generated plans

mod addressing;
mod planning;
