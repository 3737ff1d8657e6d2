// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace management utilities

use crate::error::{OcsdkError, Result};
use crate::kubernetes::cluster::{Deletion, Ensured};
use crate::kubernetes::lookup::Lookup;
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{DeleteParams, ObjectMeta, PostParams},
    Api, Client,
};
use tracing::{debug, info, instrument};

/// Ensure a namespace exists in the cluster, create if it doesn't
#[instrument(skip(client))]
pub async fn ensure_namespace_exists(client: &Client, namespace: &str) -> Result<Ensured> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(_) => {
            debug!("Namespace {} already exists", namespace);
            Ok(Ensured::AlreadyExists)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            info!("Creating namespace {}", namespace);
            let ns = Namespace {
                metadata: ObjectMeta {
                    name: Some(namespace.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            };
            namespaces
                .create(&PostParams::default(), &ns)
                .await
                .map_err(|e| {
                    OcsdkError::NamespaceError(format!(
                        "Failed to create namespace {}: {}",
                        namespace, e
                    ))
                })?;
            info!("Namespace {} created successfully", namespace);
            Ok(Ensured::Created)
        }
        Err(e) => Err(OcsdkError::NamespaceError(format!(
            "Failed to check/create namespace {}: {}",
            namespace, e
        ))),
    }
}

#[instrument(skip(client))]
pub async fn get_namespace(client: &Client, namespace: &str) -> Lookup<Namespace> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    Lookup::from_result(namespaces.get(namespace).await)
}

/// Request deletion of a namespace; an already missing namespace is not an error
#[instrument(skip(client))]
pub async fn delete_namespace(client: &Client, namespace: &str) -> Result<Deletion> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.delete(namespace, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deletion of namespace {} requested", namespace);
            Ok(Deletion::Requested)
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("Namespace {} already gone", namespace);
            Ok(Deletion::AlreadyAbsent)
        }
        Err(e) => Err(OcsdkError::DeleteFailed {
            kind: "Namespace".to_string(),
            name: namespace.to_string(),
            message: e.to_string(),
        }),
    }
}
