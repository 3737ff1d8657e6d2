// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Broker teardown: endpoint, broker instance, then the namespace.

use crate::config::PollSettings;
use crate::constants::broker;
use crate::error::Result;
use crate::kubernetes::{ClusterClient, Deletion, Lookup};
use crate::lifecycle::poll::{ConditionSet, Poller, Probe, Tick};
use crate::types::{ZosCloudBroker, ZosEndpoint};
use kube::ResourceExt;
use tracing::{debug, info, instrument, warn};

/// Progress of a cleanup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupState {
    NotStarted,
    EndpointDeleteRequested,
    EndpointAbsent,
    BrokerInstanceDeleteRequested,
    NamespaceDeleteRequested,
    Done,
}

/// Conditions awaited after the namespace deletion was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupCondition {
    BrokerDeleted,
    NamespaceDeleted,
}

/// Removes an endpoint, the broker instance and the broker namespace
pub struct BrokerCleanup {
    client: ClusterClient,
    poller: Poller,
    attempts_per_step: u32,
    state: CleanupState,
}

impl BrokerCleanup {
    pub fn new(client: ClusterClient, poll: PollSettings) -> Self {
        Self {
            client,
            poller: Poller::new(poll.interval),
            attempts_per_step: poll.attempts_per_step,
            state: CleanupState::NotStarted,
        }
    }

    pub fn state(&self) -> CleanupState {
        self.state
    }

    fn advance(&mut self, state: CleanupState) {
        info!(namespace = %self.client.namespace(), ?state, "Cleanup progressed");
        self.state = state;
    }

    /// Tear everything down.
    ///
    /// Endpoint and broker deletion are best effort. Only a failed namespace
    /// deletion or an exhausted poll budget is returned as an error.
    #[instrument(skip(self), fields(namespace = %self.client.namespace()))]
    pub async fn cleanup(&mut self, endpoint: Option<&str>) -> Result<()> {
        if let Some(name) = endpoint {
            self.delete_endpoint(name).await;
        }

        if let Err(e) = self.client.delete::<ZosCloudBroker>(broker::INSTANCE_NAME).await {
            debug!("Ignoring broker instance deletion failure: {}", e);
        }
        self.advance(CleanupState::BrokerInstanceDeleteRequested);

        self.client.delete_namespace().await?;
        self.advance(CleanupState::NamespaceDeleteRequested);

        let mut probe = CleanupProbe {
            client: &self.client,
            conditions: ConditionSet::independent([
                CleanupCondition::BrokerDeleted,
                CleanupCondition::NamespaceDeleted,
            ]),
        };
        let attempts = self.poller.drive(&mut probe, self.attempts_per_step).await?;

        info!(attempts, "Broker namespace removed");
        self.advance(CleanupState::Done);
        Ok(())
    }

    /// Delete the endpoint and wait until it no longer shows up in a list.
    /// A failed deletion request skips the wait; a wait that runs out of
    /// attempts is logged and teardown carries on.
    async fn delete_endpoint(&mut self, name: &str) {
        match self.client.delete::<ZosEndpoint>(name).await {
            Ok(Deletion::Requested) => {
                self.advance(CleanupState::EndpointDeleteRequested);
                let client = &self.client;
                let waited = self
                    .poller
                    .until(self.attempts_per_step, || async move {
                        Ok(endpoint_absent(client, name).await)
                    })
                    .await;
                match waited {
                    Ok(_) => self.advance(CleanupState::EndpointAbsent),
                    Err(e) => warn!("ZosEndpoint {} still present, continuing: {}", name, e),
                }
            }
            Ok(Deletion::AlreadyAbsent) => {
                debug!("ZosEndpoint {} does not exist, nothing to wait for", name);
            }
            Err(e) => {
                warn!("Could not delete ZosEndpoint {}, not waiting for it: {}", name, e);
            }
        }
    }

    pub async fn broker_deleted_successfully(&self) -> bool {
        self.client.get_broker().await.is_absent()
    }

    pub async fn namespace_deleted_successfully(&self) -> bool {
        self.client.get_namespace().await.is_absent()
    }
}

struct CleanupProbe<'a> {
    client: &'a ClusterClient,
    conditions: ConditionSet<CleanupCondition>,
}

impl Probe for CleanupProbe<'_> {
    async fn tick(&mut self) -> Result<Tick> {
        let client = self.client;
        let done = self
            .conditions
            .evaluate(|condition| async move {
                Ok(match condition {
                    CleanupCondition::BrokerDeleted => client.get_broker().await.is_absent(),
                    CleanupCondition::NamespaceDeleted => client.get_namespace().await.is_absent(),
                })
            })
            .await?;

        Ok(if done { Tick::Done } else { Tick::Pending })
    }
}

/// Absent from the endpoint list; a missing endpoint CRD counts as absent
async fn endpoint_absent(client: &ClusterClient, name: &str) -> bool {
    match client.list_endpoints().await {
        Lookup::Found(endpoints) => !endpoints.iter().any(|e| e.name_any() == name),
        Lookup::Absent => true,
        Lookup::Failed(e) => {
            warn!("Could not list ZosEndpoints: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcsdkError;
    use crate::test_utils::{list_json, namespace_json, not_found_json, object_json, status_json, MockService};
    use std::time::Duration;

    const NS: &str = "/api/v1/namespaces/zoscb";
    const BROKER: &str = "/apis/zoscb.ibm.com/v2beta2/namespaces/zoscb/zoscloudbrokers/zoscloudbroker";
    const ENDPOINTS: &str = "/apis/zoscb.ibm.com/v2beta2/namespaces/zoscb/zosendpoints";
    const ENDPOINT: &str = "/apis/zoscb.ibm.com/v2beta2/namespaces/zoscb/zosendpoints/lpar1";

    fn cleanup(mock: &MockService) -> BrokerCleanup {
        BrokerCleanup::new(
            ClusterClient::new(mock.clone().into_client(), "zoscb"),
            PollSettings {
                interval: Duration::from_secs(5),
                attempts_per_step: 4,
            },
        )
    }

    fn broker_json() -> String {
        object_json(
            "zoscb.ibm.com/v2beta2",
            "ZosCloudBroker",
            "zoscloudbroker",
            serde_json::json!({}),
            Some("Successful"),
        )
        .to_string()
    }

    fn endpoint_json() -> serde_json::Value {
        object_json(
            "zoscb.ibm.com/v2beta2",
            "ZosEndpoint",
            "lpar1",
            serde_json::json!({ "host": "lpar1.example.com", "port": 22, "type": "remote" }),
            Some("Successful"),
        )
    }

    fn not_found() -> (u16, String) {
        (404, not_found_json("resource", "missing"))
    }

    #[tokio::test]
    async fn test_missing_namespace_counts_as_deleted() {
        let mock = MockService::new();
        let cleanup = cleanup(&mock);

        assert!(cleanup.namespace_deleted_successfully().await);
        assert!(cleanup.broker_deleted_successfully().await);
    }

    #[tokio::test]
    async fn test_existing_namespace_is_not_deleted() {
        let mock = MockService::new().on_get(NS, 200, &namespace_json("zoscb"));
        assert!(!cleanup(&mock).namespace_deleted_successfully().await);
    }

    #[tokio::test]
    async fn test_failed_read_is_not_deleted() {
        let mock = MockService::new().on_get(NS, 500, &status_json(500, "InternalError"));
        assert!(!cleanup(&mock).namespace_deleted_successfully().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cleanup() {
        let mock = MockService::new()
            .on_delete(ENDPOINT, 200, &endpoint_json().to_string())
            .on_get_sequence(
                ENDPOINTS,
                vec![
                    (200, list_json("zoscb.ibm.com/v2beta2", "ZosEndpoint", vec![endpoint_json()])),
                    (200, list_json("zoscb.ibm.com/v2beta2", "ZosEndpoint", vec![])),
                ],
            )
            .on_delete(BROKER, 200, &broker_json())
            .on_delete(NS, 200, &namespace_json("zoscb"))
            .on_get_sequence(BROKER, vec![(200, broker_json()), not_found()])
            .on_get_sequence(
                NS,
                vec![
                    (200, namespace_json("zoscb")),
                    (200, namespace_json("zoscb")),
                    not_found(),
                ],
            );
        let mut cleanup = cleanup(&mock);

        cleanup.cleanup(Some("lpar1")).await.unwrap();

        assert_eq!(cleanup.state(), CleanupState::Done);
        assert_eq!(mock.calls("GET", ENDPOINTS), 2);
        assert_eq!(mock.calls("DELETE", NS), 1);
        // broker latched on the second tick and was not read again
        assert_eq!(mock.calls("GET", BROKER), 2);
        assert_eq!(mock.calls("GET", NS), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_waits_for_both_conditions() {
        let mock = MockService::new()
            .on_delete(NS, 200, &namespace_json("zoscb"))
            .on_get(NS, 200, &namespace_json("zoscb"));
        let mut cleanup = cleanup(&mock);

        // the broker is gone from the start, the namespace never goes away
        let err = cleanup.cleanup(None).await.unwrap_err();

        assert!(matches!(err, OcsdkError::PollTimeout { attempts: 4 }));
        assert_eq!(cleanup.state(), CleanupState::NamespaceDeleteRequested);
        assert_eq!(mock.calls("GET", BROKER), 1);
        assert_eq!(mock.calls("GET", NS), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_waits_for_broker_after_namespace_is_gone() {
        let mock = MockService::new()
            .on_delete(BROKER, 200, &broker_json())
            .on_delete(NS, 200, &namespace_json("zoscb"))
            .on_get(BROKER, 200, &broker_json());
        let mut cleanup = cleanup(&mock);

        // the namespace is gone from the start, the broker never goes away
        let err = cleanup.cleanup(None).await.unwrap_err();

        assert!(matches!(err, OcsdkError::PollTimeout { attempts: 4 }));
        assert_eq!(cleanup.state(), CleanupState::NamespaceDeleteRequested);
        assert_eq!(mock.calls("GET", NS), 1);
        assert_eq!(mock.calls("GET", BROKER), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stuck_endpoint_does_not_stop_teardown() {
        let mock = MockService::new()
            .on_delete(ENDPOINT, 200, &endpoint_json().to_string())
            .on_get(
                ENDPOINTS,
                200,
                &list_json("zoscb.ibm.com/v2beta2", "ZosEndpoint", vec![endpoint_json()]),
            )
            .on_delete(NS, 200, &namespace_json("zoscb"));
        let mut cleanup = cleanup(&mock);

        cleanup.cleanup(Some("lpar1")).await.unwrap();

        assert_eq!(mock.calls("GET", ENDPOINTS), 4);
        assert_eq!(mock.calls("DELETE", BROKER), 1);
        assert_eq!(mock.calls("DELETE", NS), 1);
        assert_eq!(cleanup.state(), CleanupState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_endpoint_delete_failure_skips_endpoint_wait() {
        let mock = MockService::new()
            .on_delete(ENDPOINT, 403, &status_json(403, "Forbidden"))
            .on_delete(BROKER, 500, &status_json(500, "InternalError"))
            .on_delete(NS, 200, &namespace_json("zoscb"));
        let mut cleanup = cleanup(&mock);

        cleanup.cleanup(Some("lpar1")).await.unwrap();

        assert_eq!(mock.calls("GET", ENDPOINTS), 0);
        assert_eq!(cleanup.state(), CleanupState::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn test_namespace_delete_failure_propagates() {
        let mock = MockService::new().on_delete(NS, 403, &status_json(403, "Forbidden"));
        let mut cleanup = cleanup(&mock);

        let err = cleanup.cleanup(None).await.unwrap_err();

        assert!(matches!(err, OcsdkError::DeleteFailed { .. }));
        assert_eq!(cleanup.state(), CleanupState::BrokerInstanceDeleteRequested);
        assert_eq!(mock.calls("GET", NS), 0);
    }
}
