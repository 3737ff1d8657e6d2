// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! z/OS Cloud Broker custom resources (`zoscb.ibm.com/v2beta2`).

use crate::constants::broker;
use crate::types::status::{PhaseReporting, PhaseStatus};
use kube::CustomResource;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "zoscb.ibm.com",
    version = "v2beta2",
    kind = "ZosCloudBroker",
    plural = "zoscloudbrokers"
)]
#[kube(namespaced)]
#[kube(status = "PhaseStatus")]
#[serde(rename_all = "camelCase")]
pub struct ZosCloudBrokerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<BrokerStorage>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrokerStorage {
    pub configure: bool,
    pub enabled: bool,
}

impl ZosCloudBroker {
    /// The singleton broker instance created during installation
    pub fn default_instance(namespace: &str) -> Self {
        let mut broker = ZosCloudBroker::new(
            broker::INSTANCE_NAME,
            ZosCloudBrokerSpec {
                log_level: Some("info".to_string()),
                ui_enabled: Some(false),
                storage: Some(BrokerStorage {
                    configure: false,
                    enabled: false,
                }),
            },
        );
        broker.metadata.namespace = Some(namespace.to_string());
        broker
    }
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "zoscb.ibm.com",
    version = "v2beta2",
    kind = "ZosEndpoint",
    plural = "zosendpoints"
)]
#[kube(namespaced)]
#[kube(status = "PhaseStatus")]
#[serde(rename_all = "camelCase")]
pub struct ZosEndpointSpec {
    pub host: String,
    pub port: u16,
    /// `remote` or `local`
    #[serde(rename = "type")]
    pub endpoint_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "zoscb.ibm.com",
    version = "v2beta2",
    kind = "SubOperatorConfig",
    plural = "suboperatorconfigs"
)]
#[kube(namespaced)]
#[kube(status = "PhaseStatus")]
#[serde(rename_all = "camelCase")]
pub struct SubOperatorConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator_collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<serde_json::Value>,
}

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(
    group = "zoscb.ibm.com",
    version = "v2beta2",
    kind = "OperatorCollection",
    plural = "operatorcollections"
)]
#[kube(namespaced)]
#[kube(status = "PhaseStatus")]
#[serde(rename_all = "camelCase")]
pub struct OperatorCollectionSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_secret_name: Option<String>,
}

macro_rules! phase_reporting {
    ($($kind:ty),+) => {
        $(
            impl PhaseReporting for $kind {
                fn phase(&self) -> Option<&str> {
                    self.status.as_ref().and_then(|s| s.phase.as_deref())
                }
            }
        )+
    };
}

phase_reporting!(ZosCloudBroker, ZosEndpoint, SubOperatorConfig, OperatorCollection);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::status::DisplayStatus;
    use kube::ResourceExt;

    #[test]
    fn test_default_broker_instance() {
        let broker = ZosCloudBroker::default_instance("zoscb");
        assert_eq!(broker.name_any(), "zoscloudbroker");
        assert_eq!(broker.namespace().as_deref(), Some("zoscb"));
        assert!(broker.status.is_none());
        assert!(!broker.is_successful());
    }

    #[test]
    fn test_broker_phase_from_json() {
        let broker: ZosCloudBroker = serde_json::from_value(serde_json::json!({
            "apiVersion": "zoscb.ibm.com/v2beta2",
            "kind": "ZosCloudBroker",
            "metadata": { "name": "zoscloudbroker", "namespace": "zoscb" },
            "spec": { "logLevel": "info" },
            "status": { "phase": "Successful" }
        }))
        .unwrap();

        assert!(broker.is_successful());
        assert_eq!(broker.display_status(), DisplayStatus::Pass);
    }

    #[test]
    fn test_endpoint_serializes_type_field() {
        let endpoint = ZosEndpoint::new(
            "lpar1",
            ZosEndpointSpec {
                host: "lpar1.example.com".to_string(),
                port: 22,
                endpoint_type: "remote".to_string(),
                credential_type: None,
            },
        );

        let json = serde_json::to_value(&endpoint).unwrap();
        assert_eq!(json["spec"]["type"], "remote");
        assert_eq!(json["kind"], "ZosEndpoint");
        assert_eq!(json["apiVersion"], "zoscb.ibm.com/v2beta2");
        assert!(json["spec"].get("credentialType").is_none());
    }

    #[test]
    fn test_operator_collection_without_phase_displays_failure() {
        let collection = OperatorCollection::new("demo", OperatorCollectionSpec::default());
        assert_eq!(collection.display_status(), DisplayStatus::Fail);
    }
}
