// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One-shot status of the broker and the operator collection objects in a namespace.

use crate::constants::broker;
use crate::kubernetes::console::{console_url, resource_url};
use crate::kubernetes::{api_available, ClusterClient};
use crate::types::{DisplayStatus, PhaseReporting};
use kube::core::DynamicObject;
use kube::{Resource, ResourceExt};
use serde::Serialize;
use tracing::{instrument, warn};
use url::Url;

/// Status of a single custom resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceStatus {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub status: DisplayStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ResourceStatus {
    fn of<K>(resource: &K, console: Option<&Url>) -> Self
    where
        K: Resource<DynamicType = ()> + PhaseReporting,
    {
        let kind = K::kind(&()).to_string();
        let api_version = K::api_version(&()).to_string();
        Self::build(resource, &kind, &api_version, console)
    }

    fn dynamic(resource: &DynamicObject, api_version: &str, kind: &str, console: Option<&Url>) -> Self {
        Self::build(resource, kind, api_version, console)
    }

    fn build<K>(resource: &K, kind: &str, api_version: &str, console: Option<&Url>) -> Self
    where
        K: ResourceExt + PhaseReporting,
    {
        let name = resource.name_any();
        let url = console.and_then(|c| {
            resource_url(
                c,
                &resource.namespace().unwrap_or_default(),
                api_version,
                kind,
                &name,
            )
        });

        Self {
            kind: kind.to_string(),
            phase: resource.phase().map(str::to_string),
            status: resource.display_status(),
            name,
            url: url.map(String::from),
        }
    }
}

/// Everything shown for a namespace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub namespace: String,
    /// Whether the broker CRDs are served by the cluster at all
    pub broker_api_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broker: Option<ResourceStatus>,
    pub endpoints: Vec<ResourceStatus>,
    pub suboperator_configs: Vec<ResourceStatus>,
    pub operator_collections: Vec<ResourceStatus>,
}

/// Read the broker and operator collection objects of the client's namespace
#[instrument(skip(client), fields(namespace = %client.namespace()))]
pub async fn collect_status(client: &ClusterClient) -> StatusReport {
    let broker_api_available = api_available(
        client.client(),
        broker::API_GROUP,
        broker::API_VERSION,
        "ZosCloudBroker",
    )
    .await
    .unwrap_or_else(|e| {
        warn!("API discovery failed: {}", e);
        false
    });

    let console = console_url(client.client()).await;
    let console = console.as_ref();

    let broker = client
        .get_broker()
        .await
        .found()
        .map(|b| ResourceStatus::of(&b, console));
    let endpoints = client.list_endpoints().await.found().unwrap_or_default();
    let configs = client
        .list_suboperator_configs()
        .await
        .found()
        .unwrap_or_default();
    let collections = client
        .list_operator_collections()
        .await
        .found()
        .unwrap_or_default();

    StatusReport {
        namespace: client.namespace().to_string(),
        broker_api_available,
        console_url: console.map(|c| c.to_string()),
        broker,
        endpoints: endpoints.iter().map(|e| ResourceStatus::of(e, console)).collect(),
        suboperator_configs: configs.iter().map(|c| ResourceStatus::of(c, console)).collect(),
        operator_collections: collections
            .iter()
            .map(|c| ResourceStatus::of(c, console))
            .collect(),
    }
}

/// Status of the custom resources a sub-operator manages, e.g. kind `ZosDataset` in `v1`
#[instrument(skip(client), fields(namespace = %client.namespace()))]
pub async fn collect_suboperator_status(
    client: &ClusterClient,
    version: &str,
    kind: &str,
) -> Vec<ResourceStatus> {
    let api_version = format!("{}/{}", broker::SUBOPERATOR_GROUP, version);
    let console = console_url(client.client()).await;

    client
        .list_suboperator_resources(version, kind)
        .await
        .found()
        .unwrap_or_default()
        .iter()
        .map(|r| ResourceStatus::dynamic(r, &api_version, kind, console.as_ref()))
        .collect()
}
