// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Broker install, cleanup and status flows built on the polling primitives.

pub mod cleanup;
pub mod install;
pub mod poll;
pub mod status;

pub use cleanup::{BrokerCleanup, CleanupCondition, CleanupState};
pub use install::{BrokerInstaller, EndpointRequest, InstallCondition, InstallState};
pub use poll::{ConditionSet, Poller, Probe, Tick};
pub use status::{collect_status, collect_suboperator_status, ResourceStatus, StatusReport};
