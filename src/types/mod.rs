// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types read and written by the lifecycle flows.

pub mod olm;
pub mod status;
pub mod zoscb;

pub use olm::{ClusterServiceVersion, OperatorGroup, Subscription};
pub use status::{display_status, DisplayStatus, PhaseReporting, PhaseStatus, ResourcePhase};
pub use zoscb::{OperatorCollection, SubOperatorConfig, ZosCloudBroker, ZosEndpoint};
