// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for client creation, resource access, discovery and namespaces.

pub mod client;
pub mod cluster;
pub mod console;
pub mod crd;
pub mod lookup;
pub mod namespaces;
pub mod pods;

pub use client::connect;
pub use cluster::{ClusterClient, Deletion, Ensured};
pub use crd::api_available;
pub use lookup::Lookup;
pub use namespaces::ensure_namespace_exists;
