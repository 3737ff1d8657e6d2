// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! External CLI processes: `oc`, `ansible-galaxy` and `ansible-playbook`.

pub mod commands;
pub mod runner;

pub use commands::PlaybookAction;
pub use runner::{run_command, CommandSpec, OutputSink, OutputStream, TracingSink};
