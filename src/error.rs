// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcsdkError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to build cluster client: {0}")]
    KubeconfigError(String),

    #[error("Failed to create {kind} {name}: {message}")]
    CreateFailed {
        kind: String,
        name: String,
        message: String,
    },

    #[error("Failed to delete {kind} {name}: {message}")]
    DeleteFailed {
        kind: String,
        name: String,
        message: String,
    },

    #[error("Namespace creation failed: {0}")]
    NamespaceError(String),

    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Gave up polling after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("Command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Command `{command}` could not be started: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OcsdkError {
    /// Exit code of a failed external command, if it exited normally
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            OcsdkError::CommandFailed { status, .. } => status.code(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OcsdkError>;
