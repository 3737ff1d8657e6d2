// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Broker operator installation.
//!
//! Namespace, OperatorGroup and Subscription are ensured up front. The poll
//! then waits for the subscription, the CSV and the broker instance in that
//! order; the broker instance is created once its CSV has succeeded.

use crate::config::{CatalogSource, PollSettings};
use crate::constants::broker;
use crate::error::{OcsdkError, Result};
use crate::kubernetes::{ClusterClient, Ensured, Lookup};
use crate::lifecycle::poll::{ConditionSet, Poller, Probe, Tick};
use crate::types::olm::{OperatorGroupSpec, SubscriptionSpec};
use crate::types::zoscb::ZosEndpointSpec;
use crate::types::{OperatorGroup, PhaseReporting, Subscription, ZosCloudBroker, ZosEndpoint};
use kube::ResourceExt;
use tracing::{debug, info, instrument, warn};

/// Progress of an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    NotStarted,
    NamespaceEnsured,
    OperatorGroupEnsured,
    SubscriptionEnsured,
    SubscriptionInstalled,
    CsvInstalled,
    BrokerInstanceInstalled,
    Done,
}

/// Conditions awaited after the subscription exists, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallCondition {
    SubscriptionInstalled,
    CsvInstalled,
    BrokerInstalled,
}

/// Endpoint to provision once the broker is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRequest {
    pub name: String,
    pub host: String,
    pub port: u16,
}

/// Installs the z/OS Cloud Broker operator and its instance into a namespace
pub struct BrokerInstaller {
    client: ClusterClient,
    catalog: CatalogSource,
    poller: Poller,
    attempts_per_step: u32,
    state: InstallState,
}

impl BrokerInstaller {
    pub fn new(client: ClusterClient, catalog: CatalogSource, poll: PollSettings) -> Self {
        Self {
            client,
            catalog,
            poller: Poller::new(poll.interval),
            attempts_per_step: poll.attempts_per_step,
            state: InstallState::NotStarted,
        }
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    fn advance(&mut self, state: InstallState) {
        info!(namespace = %self.client.namespace(), ?state, "Install progressed");
        self.state = state;
    }

    /// Run the whole installation; fails on a broken mutation or an exhausted budget
    #[instrument(skip(self), fields(namespace = %self.client.namespace()))]
    pub async fn install(&mut self) -> Result<()> {
        self.client.ensure_namespace().await?;
        self.advance(InstallState::NamespaceEnsured);

        self.ensure_operator_group().await?;
        self.advance(InstallState::OperatorGroupEnsured);

        self.ensure_subscription().await?;
        self.advance(InstallState::SubscriptionEnsured);
        let budget = self.attempts_per_step;

        let mut probe = InstallProbe {
            client: &self.client,
            catalog: &self.catalog,
            conditions: ConditionSet::ordered([
                InstallCondition::SubscriptionInstalled,
                InstallCondition::CsvInstalled,
                InstallCondition::BrokerInstalled,
            ]),
            broker_requested: false,
            attempts_per_step: self.attempts_per_step,
        };
        let outcome = self.poller.drive(&mut probe, budget).await;
        let reached = probe.reached();
        self.state = reached;

        match outcome {
            Ok(attempts) => {
                info!(attempts, "Broker operator installed");
                self.advance(InstallState::Done);
                Ok(())
            }
            Err(e) => {
                warn!(state = ?reached, "Broker installation did not complete: {}", e);
                Err(e)
            }
        }
    }

    /// Create the namespace's OperatorGroup unless one exists; more than one is an error.
    /// A failed list is returned rather than taken as an empty namespace.
    pub async fn ensure_operator_group(&self) -> Result<Ensured> {
        let namespace = self.client.namespace();
        let existing = self
            .client
            .list_operator_groups()
            .await
            .into_result()?
            .unwrap_or_default();

        match existing.len() {
            0 => {
                let mut group = OperatorGroup::new(
                    &format!("{}-operatorgroup", namespace),
                    OperatorGroupSpec {
                        target_namespaces: Some(vec![namespace.to_string()]),
                    },
                );
                group.metadata.namespace = Some(namespace.to_string());
                self.client.create(&group).await?;
                Ok(Ensured::Created)
            }
            1 => {
                debug!("OperatorGroup {} already exists", existing[0].name_any());
                Ok(Ensured::AlreadyExists)
            }
            n => Err(OcsdkError::InvariantViolation(format!(
                "found {} OperatorGroups in namespace {}, expected at most one",
                n, namespace
            ))),
        }
    }

    /// Subscribe to the broker package unless the subscription exists
    pub async fn ensure_subscription(&self) -> Result<Ensured> {
        if self
            .client
            .get_subscription(broker::PACKAGE)
            .await
            .into_result()?
            .is_some()
        {
            debug!("Subscription {} already exists", broker::PACKAGE);
            return Ok(Ensured::AlreadyExists);
        }

        let mut subscription = Subscription::new(
            broker::PACKAGE,
            SubscriptionSpec {
                channel: Some(self.catalog.channel()),
                name: broker::PACKAGE.to_string(),
                source: self.catalog.name.clone(),
                source_namespace: self.catalog.namespace.clone(),
                starting_csv: Some(self.catalog.csv.clone()),
                install_plan_approval: Some("Automatic".to_string()),
            },
        );
        subscription.metadata.namespace = Some(self.client.namespace().to_string());
        self.client.create(&subscription).await?;
        Ok(Ensured::Created)
    }

    /// Create the singleton broker instance unless it exists
    pub async fn ensure_broker_instance(&self) -> Result<Ensured> {
        ensure_broker_instance(&self.client).await
    }

    pub async fn subscription_installed_successfully(&self) -> bool {
        subscription_installed(&self.client).await
    }

    pub async fn csv_installed_successfully(&self) -> bool {
        csv_installed(&self.client, &self.catalog).await
    }

    pub async fn broker_installed_successfully(&self) -> bool {
        broker_installed(&self.client).await
    }

    /// Create the endpoint unless it exists, then wait until it reports `Successful`
    #[instrument(skip(self, request), fields(endpoint = %request.name))]
    pub async fn provision_endpoint(&self, request: &EndpointRequest) -> Result<Ensured> {
        let ensured = match self.client.get::<ZosEndpoint>(&request.name).await {
            Lookup::Found(_) => {
                debug!("ZosEndpoint {} already exists", request.name);
                Ensured::AlreadyExists
            }
            Lookup::Failed(e) => return Err(e.into()),
            Lookup::Absent => {
                let mut endpoint = ZosEndpoint::new(
                    &request.name,
                    ZosEndpointSpec {
                        host: request.host.clone(),
                        port: request.port,
                        endpoint_type: "remote".to_string(),
                        credential_type: None,
                    },
                );
                endpoint.metadata.namespace = Some(self.client.namespace().to_string());
                self.client.create(&endpoint).await?;
                Ensured::Created
            }
        };

        let client = &self.client;
        let name = request.name.as_str();
        self.poller
            .until(self.attempts_per_step, || async move {
                Ok(client
                    .get::<ZosEndpoint>(name)
                    .await
                    .found()
                    .is_some_and(|e| e.is_successful()))
            })
            .await?;

        info!("ZosEndpoint {} is ready", request.name);
        Ok(ensured)
    }
}

struct InstallProbe<'a> {
    client: &'a ClusterClient,
    catalog: &'a CatalogSource,
    conditions: ConditionSet<InstallCondition>,
    broker_requested: bool,
    attempts_per_step: u32,
}

impl InstallProbe<'_> {
    fn reached(&self) -> InstallState {
        if self.conditions.is_latched(InstallCondition::BrokerInstalled) {
            InstallState::BrokerInstanceInstalled
        } else if self.conditions.is_latched(InstallCondition::CsvInstalled) {
            InstallState::CsvInstalled
        } else if self.conditions.is_latched(InstallCondition::SubscriptionInstalled) {
            InstallState::SubscriptionInstalled
        } else {
            InstallState::SubscriptionEnsured
        }
    }
}

impl Probe for InstallProbe<'_> {
    async fn tick(&mut self) -> Result<Tick> {
        let client = self.client;
        let catalog = self.catalog;

        let done = self
            .conditions
            .evaluate(|condition| async move {
                Ok(match condition {
                    InstallCondition::SubscriptionInstalled => subscription_installed(client).await,
                    InstallCondition::CsvInstalled => csv_installed(client, catalog).await,
                    InstallCondition::BrokerInstalled => broker_installed(client).await,
                })
            })
            .await?;

        if done {
            return Ok(Tick::Done);
        }

        if self.conditions.is_latched(InstallCondition::CsvInstalled) && !self.broker_requested {
            ensure_broker_instance(client).await?;
            self.broker_requested = true;
            return Ok(Tick::Granted(self.attempts_per_step));
        }

        Ok(Tick::Pending)
    }
}

async fn ensure_broker_instance(client: &ClusterClient) -> Result<Ensured> {
    if client.get_broker().await.into_result()?.is_some() {
        debug!("ZosCloudBroker {} already exists", broker::INSTANCE_NAME);
        return Ok(Ensured::AlreadyExists);
    }

    client
        .create(&ZosCloudBroker::default_instance(client.namespace()))
        .await?;
    Ok(Ensured::Created)
}

async fn subscription_installed(client: &ClusterClient) -> bool {
    client
        .get_subscription(broker::PACKAGE)
        .await
        .found()
        .is_some_and(|s| s.is_installed())
}

/// The CSV the subscription reports as installed, or the pinned one
async fn csv_installed(client: &ClusterClient, catalog: &CatalogSource) -> bool {
    let csv_name = client
        .get_subscription(broker::PACKAGE)
        .await
        .found()
        .and_then(|s| s.installed_csv().map(str::to_string))
        .unwrap_or_else(|| catalog.csv.clone());

    client
        .get_cluster_service_version(&csv_name)
        .await
        .found()
        .is_some_and(|csv| csv.is_succeeded())
}

async fn broker_installed(client: &ClusterClient) -> bool {
    client
        .get_broker()
        .await
        .found()
        .is_some_and(|b| b.is_successful())
}
