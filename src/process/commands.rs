// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Invocations of `oc`, `ansible-galaxy` and `ansible-playbook`.

use crate::constants::sdk;
use crate::process::runner::CommandSpec;
use std::collections::BTreeMap;
use std::path::Path;

/// Playbooks shipped with the Operator Collection SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlaybookAction {
    CreateOperator,
    DeleteOperator,
    RedeployCollection,
    RedeployOperator,
}

impl PlaybookAction {
    pub fn playbook_name(&self) -> &'static str {
        match self {
            PlaybookAction::CreateOperator => "create_operator",
            PlaybookAction::DeleteOperator => "delete_operator",
            PlaybookAction::RedeployCollection => "redeploy_collection",
            PlaybookAction::RedeployOperator => "redeploy_operator",
        }
    }

    /// Fully qualified playbook, e.g. `ibm.operator_collection_sdk.create_operator`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", sdk::COLLECTION, self.playbook_name())
    }
}

/// `oc login --server=<url> --token=<token>`
pub fn oc_login(server_url: &str, token: &str, insecure_skip_tls_verify: bool) -> CommandSpec {
    let spec = CommandSpec::new("oc").args([
        "login".to_string(),
        format!("--server={}", server_url),
        format!("--token={}", token),
    ]);
    if insecure_skip_tls_verify {
        spec.arg("--insecure-skip-tls-verify=true")
    } else {
        spec
    }
}

/// `oc project <namespace>`
pub fn oc_project(namespace: &str) -> CommandSpec {
    CommandSpec::new("oc").args(["project", namespace])
}

/// `oc cp <namespace>/<pod>:<remote> <local> -c <container>`
pub fn oc_copy_from_pod(
    namespace: &str,
    pod: &str,
    container: &str,
    remote_path: &str,
    local_path: &Path,
) -> CommandSpec {
    CommandSpec::new("oc").args([
        "cp".to_string(),
        format!("{}/{}:{}", namespace, pod, remote_path),
        local_path.display().to_string(),
        "-c".to_string(),
        container.to_string(),
    ])
}

/// `ansible-galaxy collection install ibm.operator_collection_sdk`
pub fn galaxy_install(force: bool) -> CommandSpec {
    let spec = CommandSpec::new("ansible-galaxy").args(["collection", "install", sdk::COLLECTION]);
    if force {
        spec.arg("--force")
    } else {
        spec
    }
}

/// `ansible-galaxy collection verify ibm.operator_collection_sdk`
pub fn galaxy_verify() -> CommandSpec {
    CommandSpec::new("ansible-galaxy").args(["collection", "verify", sdk::COLLECTION])
}

/// `ansible-playbook -e k=v ... ibm.operator_collection_sdk.<action>` run inside
/// the collection directory.
///
/// Jinja2 native types are enabled and `PWD` points at the collection through
/// the per-call environment.
pub fn playbook(
    action: PlaybookAction,
    collection_dir: &Path,
    extra_vars: &BTreeMap<String, String>,
) -> CommandSpec {
    let mut spec = CommandSpec::new("ansible-playbook");
    for (key, value) in extra_vars {
        spec = spec.args(["-e".to_string(), format!("{}={}", key, value)]);
    }

    spec.arg(action.qualified_name())
        .env(sdk::JINJA2_NATIVE_VAR, "true")
        .env("PWD", collection_dir.display().to_string())
        .current_dir(collection_dir)
}
