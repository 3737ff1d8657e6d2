// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::error::Result;
use kube::{discovery::Discovery, Client};
use tracing::debug;

/// Check whether `kind` is served under `group/version` by discovering the group.
pub async fn api_available(client: &Client, group: &str, version: &str, kind: &str) -> Result<bool> {
    let discovery = Discovery::new(client.clone())
        .filter(&[group])
        .run()
        .await?;

    for api_group in discovery.groups() {
        if api_group.name() == group {
            // any served version counts, not only the preferred one
            for (ar, _) in api_group.versioned_resources(version) {
                if ar.kind == kind {
                    debug!("{}/{} {} is available", group, version, kind);
                    return Ok(true);
                }
            }
        }
    }

    debug!("{}/{} {} is not available", group, version, kind);
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockService;

    fn resource_list(group_version: &str) -> String {
        serde_json::json!({
            "kind": "APIResourceList",
            "apiVersion": "v1",
            "groupVersion": group_version,
            "resources": [{
                "name": "zoscloudbrokers",
                "singularName": "zoscloudbroker",
                "namespaced": true,
                "kind": "ZosCloudBroker",
                "verbs": ["get", "list", "create", "delete"]
            }]
        })
        .to_string()
    }

    fn client() -> Client {
        let groups = serde_json::json!({
            "kind": "APIGroupList",
            "apiVersion": "v1",
            "groups": [{
                "name": "zoscb.ibm.com",
                "versions": [
                    { "groupVersion": "zoscb.ibm.com/v3", "version": "v3" },
                    { "groupVersion": "zoscb.ibm.com/v2beta2", "version": "v2beta2" }
                ],
                "preferredVersion": { "groupVersion": "zoscb.ibm.com/v3", "version": "v3" }
            }]
        });
        MockService::new()
            .on_get("/apis", 200, &groups.to_string())
            .on_get("/apis/zoscb.ibm.com/v3", 200, &resource_list("zoscb.ibm.com/v3"))
            .on_get("/apis/zoscb.ibm.com/v2beta2", 200, &resource_list("zoscb.ibm.com/v2beta2"))
            .into_client()
    }

    #[tokio::test]
    async fn test_non_preferred_version_is_available() {
        let available = api_available(&client(), "zoscb.ibm.com", "v2beta2", "ZosCloudBroker")
            .await
            .unwrap();
        assert!(available);
    }

    #[tokio::test]
    async fn test_unserved_version_or_kind_is_unavailable() {
        let client = client();
        assert!(!api_available(&client, "zoscb.ibm.com", "v1", "ZosCloudBroker").await.unwrap());
        assert!(!api_available(&client, "zoscb.ibm.com", "v3", "ZosEndpoint").await.unwrap());
    }
}
