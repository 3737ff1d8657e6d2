// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace-scoped facade over the Kubernetes API.
//!
//! Reads return a [`Lookup`] and never fail the caller; creations and
//! deletions return errors wrapping the upstream failure.

use crate::constants::broker;
use crate::error::{OcsdkError, Result};
use crate::kubernetes::lookup::Lookup;
use crate::kubernetes::namespaces;
use crate::types::{
    ClusterServiceVersion, OperatorCollection, OperatorGroup, SubOperatorConfig, Subscription,
    ZosCloudBroker, ZosEndpoint,
};
use k8s_openapi::api::core::v1::{Namespace, Pod};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::{DeleteParams, ListParams, LogParams, PostParams},
    core::{DynamicObject, GroupVersionKind},
    discovery::ApiResource,
    Api, Client, Resource, ResourceExt,
};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;
use tracing::{debug, info, instrument};

/// Outcome of an idempotent "create if absent" step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensured {
    Created,
    AlreadyExists,
}

/// Outcome of a deletion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    Requested,
    AlreadyAbsent,
}

/// Kubernetes client bound to the namespace the broker lives in
#[derive(Clone)]
pub struct ClusterClient {
    client: Client,
    namespace: String,
}

impl ClusterClient {
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    pub async fn get<K>(&self, name: &str) -> Lookup<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        Lookup::from_result(self.api::<K>().get(name).await)
    }

    pub async fn list<K>(&self) -> Lookup<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        self.list_with(&ListParams::default()).await
    }

    pub async fn list_with<K>(&self, params: &ListParams) -> Lookup<Vec<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        Lookup::from_result(self.api::<K>().list(params).await).map(|list| list.items)
    }

    pub async fn create<K>(&self, obj: &K) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Serialize + Debug,
        K::DynamicType: Default,
    {
        let kind = K::kind(&K::DynamicType::default()).to_string();
        let name = obj.name_any();
        info!("Creating {} {}/{}", kind, self.namespace, name);

        self.api::<K>()
            .create(&PostParams::default(), obj)
            .await
            .map_err(|e| OcsdkError::CreateFailed {
                kind,
                name,
                message: e.to_string(),
            })
    }

    pub async fn delete<K>(&self, name: &str) -> Result<Deletion>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + DeserializeOwned + Debug,
        K::DynamicType: Default,
    {
        let kind = K::kind(&K::DynamicType::default()).to_string();

        match self.api::<K>().delete(name, &DeleteParams::default()).await {
            Ok(_) => {
                info!("Deletion of {} {}/{} requested", kind, self.namespace, name);
                Ok(Deletion::Requested)
            }
            Err(kube::Error::Api(err)) if err.code == 404 => {
                debug!("{} {}/{} already gone", kind, self.namespace, name);
                Ok(Deletion::AlreadyAbsent)
            }
            Err(e) => Err(OcsdkError::DeleteFailed {
                kind,
                name: name.to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub async fn ensure_namespace(&self) -> Result<Ensured> {
        namespaces::ensure_namespace_exists(&self.client, &self.namespace).await
    }

    pub async fn get_namespace(&self) -> Lookup<Namespace> {
        namespaces::get_namespace(&self.client, &self.namespace).await
    }

    pub async fn delete_namespace(&self) -> Result<Deletion> {
        namespaces::delete_namespace(&self.client, &self.namespace).await
    }

    pub async fn list_operator_groups(&self) -> Lookup<Vec<OperatorGroup>> {
        self.list().await
    }

    pub async fn get_subscription(&self, name: &str) -> Lookup<Subscription> {
        self.get(name).await
    }

    pub async fn get_cluster_service_version(&self, name: &str) -> Lookup<ClusterServiceVersion> {
        self.get(name).await
    }

    pub async fn get_broker(&self) -> Lookup<ZosCloudBroker> {
        self.get(broker::INSTANCE_NAME).await
    }

    pub async fn list_endpoints(&self) -> Lookup<Vec<ZosEndpoint>> {
        self.list().await
    }

    pub async fn list_suboperator_configs(&self) -> Lookup<Vec<SubOperatorConfig>> {
        self.list().await
    }

    pub async fn list_operator_collections(&self) -> Lookup<Vec<OperatorCollection>> {
        self.list().await
    }

    /// List custom resources of a sub-operator, e.g. kind `ZosDataset` in `v1`
    #[instrument(skip(self))]
    pub async fn list_suboperator_resources(
        &self,
        version: &str,
        kind: &str,
    ) -> Lookup<Vec<DynamicObject>> {
        let gvk = GroupVersionKind::gvk(broker::SUBOPERATOR_GROUP, version, kind);
        let resource = ApiResource::from_gvk(&gvk);
        let api: Api<DynamicObject> =
            Api::namespaced_with(self.client.clone(), &self.namespace, &resource);

        Lookup::from_result(api.list(&ListParams::default()).await).map(|list| list.items)
    }

    pub async fn list_pods(&self, label_selector: Option<&str>) -> Lookup<Vec<Pod>> {
        let params = match label_selector {
            Some(selector) => ListParams::default().labels(selector),
            None => ListParams::default(),
        };
        self.list_with(&params).await
    }

    #[instrument(skip(self))]
    pub async fn pod_logs(&self, pod: &str, container: Option<&str>) -> Lookup<String> {
        let pods: Api<Pod> = self.api();
        let params = LogParams {
            container: container.map(str::to_string),
            ..Default::default()
        };
        Lookup::from_result(pods.logs(pod, &params).await)
    }
}
