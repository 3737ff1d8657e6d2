// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ocsdk::config::Config;
use ocsdk::error::OcsdkError;
use ocsdk::kubernetes::pods::{download_container_logs, download_logs_by_selector};
use ocsdk::kubernetes::{connect, ClusterClient};
use ocsdk::lifecycle::{
    collect_status, collect_suboperator_status, BrokerCleanup, BrokerInstaller, EndpointRequest,
};
use ocsdk::process::{commands, PlaybookAction};

/// Operator Collection SDK tooling for the z/OS Cloud Broker on OpenShift
#[derive(Parser, Debug)]
#[command(name = "ocsdk")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in to the cluster with the configured server URL and token
    Login,
    /// Switch the current `oc` project to the configured namespace
    Project,
    /// Install the Operator Collection SDK Ansible collection
    InstallSdk {
        /// Reinstall even if already present
        #[arg(long)]
        force: bool,
    },
    /// Verify the installed Operator Collection SDK Ansible collection
    VerifySdk,
    /// Run one of the SDK playbooks against an operator collection
    Playbook {
        #[arg(value_enum)]
        action: PlaybookAction,
        /// Directory holding the operator collection
        #[arg(long, default_value = ".")]
        collection_dir: PathBuf,
        /// Extra variables passed to the playbook, as key=value
        #[arg(short = 'e', long = "extra-var", value_parser = parse_key_value)]
        extra_vars: Vec<(String, String)>,
    },
    /// Install the broker operator and instance, optionally provisioning an endpoint
    InstallBroker {
        #[arg(long, requires_all = ["endpoint_host", "endpoint_port"])]
        endpoint_name: Option<String>,
        #[arg(long)]
        endpoint_host: Option<String>,
        #[arg(long)]
        endpoint_port: Option<u16>,
    },
    /// Delete an endpoint, the broker instance and the broker namespace
    Cleanup {
        #[arg(long)]
        endpoint_name: Option<String>,
    },
    /// Print the status of the broker and its operator collection objects
    Status,
    /// Print the status of the resources a sub-operator manages
    Resources {
        /// Version of the sub-operator API, e.g. v1
        #[arg(long)]
        api_version: String,
        #[arg(long)]
        kind: String,
    },
    /// Download the logs of a pod container, or of every pod matching a label selector
    Logs {
        #[arg(required_unless_present = "selector", conflicts_with = "selector")]
        pod: Option<String>,
        #[arg(short = 'l', long)]
        selector: Option<String>,
        #[arg(short, long)]
        container: Option<String>,
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
    /// Copy a path out of a pod container
    CopyFromPod {
        pod: String,
        container: String,
        remote_path: String,
        #[arg(default_value = ".")]
        local_path: PathBuf,
    },
}

fn parse_key_value(s: &str) -> Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected key=value, got `{}`", s))?;
    Ok((key.to_string(), value.to_string()))
}

async fn cluster(config: &Config) -> Result<ClusterClient> {
    let client = connect(config).await?;
    info!("Connected to cluster, namespace={}", config.namespace);
    Ok(ClusterClient::new(client, config.namespace.clone()))
}

fn load_config() -> Result<Config> {
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config);
    Ok(config)
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::InstallSdk { force } => commands::galaxy_install(force).run().await?,
        Commands::VerifySdk => commands::galaxy_verify().run().await?,
        Commands::Playbook {
            action,
            collection_dir,
            extra_vars,
        } => {
            let extra_vars: BTreeMap<String, String> = extra_vars.into_iter().collect();
            info!("Running {} in {}", action.qualified_name(), collection_dir.display());
            commands::playbook(action, &collection_dir, &extra_vars)
                .run()
                .await?;
        }
        Commands::Login => {
            let config = load_config()?;
            let (server, token) = config
                .server_url
                .as_deref()
                .zip(config.token.as_deref())
                .context("Login requires both a server URL and a token")?;
            commands::oc_login(server, token, config.insecure_skip_tls_verify)
                .run()
                .await?;
        }
        Commands::Project => commands::oc_project(&load_config()?.namespace).run().await?,
        Commands::InstallBroker {
            endpoint_name,
            endpoint_host,
            endpoint_port,
        } => {
            let config = load_config()?;
            let mut installer =
                BrokerInstaller::new(cluster(&config).await?, config.catalog.clone(), config.poll);
            installer.install().await?;

            if let (Some(name), Some(host), Some(port)) = (endpoint_name, endpoint_host, endpoint_port) {
                installer
                    .provision_endpoint(&EndpointRequest { name, host, port })
                    .await?;
            }
        }
        Commands::Cleanup { endpoint_name } => {
            let config = load_config()?;
            let mut cleanup = BrokerCleanup::new(cluster(&config).await?, config.poll);
            cleanup.cleanup(endpoint_name.as_deref()).await?;
        }
        Commands::Status => {
            let report = collect_status(&cluster(&load_config()?).await?).await;
            print!("{}", serde_yaml::to_string(&report)?);
        }
        Commands::Resources { api_version, kind } => {
            let client = cluster(&load_config()?).await?;
            let statuses = collect_suboperator_status(&client, &api_version, &kind).await;
            print!("{}", serde_yaml::to_string(&statuses)?);
        }
        Commands::Logs {
            pod,
            selector,
            container,
            output_dir,
        } => {
            let client = cluster(&load_config()?).await?;
            let container = container.as_deref();
            let paths = match (pod, selector) {
                (Some(pod), _) => vec![download_container_logs(&client, &pod, container, &output_dir)
                    .await?
                    .with_context(|| format!("No logs found for pod {}", pod))?],
                (None, Some(selector)) => {
                    download_logs_by_selector(&client, &selector, container, &output_dir).await?
                }
                (None, None) => bail!("Either a pod name or a label selector is required"),
            };
            for path in paths {
                println!("{}", path.display());
            }
        }
        Commands::CopyFromPod {
            pod,
            container,
            remote_path,
            local_path,
        } => {
            let config = load_config()?;
            commands::oc_copy_from_pod(&config.namespace, &pod, &container, &remote_path, &local_path)
                .run()
                .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        error!("{:#}", e);
        let code = e
            .downcast_ref::<OcsdkError>()
            .and_then(OcsdkError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}
