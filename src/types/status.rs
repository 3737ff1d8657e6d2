// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Phase reporting shared by the broker custom resources.

use kube::core::DynamicObject;
use serde::{Deserialize, Serialize};

/// `status` block of the z/OS Cloud Broker resources
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhaseStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Recognized values of `status.phase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourcePhase {
    Successful,
    Pending,
    Failed,
    Unknown,
}

impl ResourcePhase {
    pub fn parse(phase: Option<&str>) -> Self {
        match phase {
            Some("Successful") => ResourcePhase::Successful,
            Some("Pending") => ResourcePhase::Pending,
            Some("Failed") => ResourcePhase::Failed,
            _ => ResourcePhase::Unknown,
        }
    }
}

/// Three-state summary shown to the user for a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pass,
    Fail,
    Pending,
}

/// Map a `status.phase` to its display status.
///
/// A missing or unrecognized phase is reported as `Fail`, never `Pending`.
pub fn display_status(phase: Option<&str>) -> DisplayStatus {
    match ResourcePhase::parse(phase) {
        ResourcePhase::Successful => DisplayStatus::Pass,
        ResourcePhase::Pending => DisplayStatus::Pending,
        ResourcePhase::Failed | ResourcePhase::Unknown => DisplayStatus::Fail,
    }
}

/// Resources exposing a `status.phase`
pub trait PhaseReporting {
    fn phase(&self) -> Option<&str>;

    fn resource_phase(&self) -> ResourcePhase {
        ResourcePhase::parse(self.phase())
    }

    fn display_status(&self) -> DisplayStatus {
        display_status(self.phase())
    }

    fn is_successful(&self) -> bool {
        self.resource_phase() == ResourcePhase::Successful
    }
}

impl PhaseReporting for DynamicObject {
    fn phase(&self) -> Option<&str> {
        self.data
            .get("status")
            .and_then(|s| s.get("phase"))
            .and_then(|p| p.as_str())
    }
}
