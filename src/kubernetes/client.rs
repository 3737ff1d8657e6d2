// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster client creation from token credentials or the local kubeconfig

use crate::config::Config;
use crate::error::{OcsdkError, Result};
use kube::{Client, Config as KConfig};
use tracing::{debug, info, instrument};

/// Create a Kubernetes client for the configured cluster.
///
/// With `OCP_SERVER_URL` and `OCP_TOKEN` set the client talks to that server
/// directly; otherwise the kubeconfig written by `oc login` is used.
#[instrument(skip(config), fields(namespace = %config.namespace))]
pub async fn connect(config: &Config) -> Result<Client> {
    match (&config.server_url, &config.token) {
        (Some(server_url), Some(token)) => {
            info!("Connecting to {} with token credentials", server_url);
            let client_config = token_config(config, server_url, token)?;
            Client::try_from(client_config).map_err(|e| {
                OcsdkError::KubeconfigError(format!("Failed to create client: {}", e))
            })
        }
        _ => create_inferred_client(config).await,
    }
}

fn token_config(config: &Config, server_url: &str, token: &str) -> Result<KConfig> {
    let cluster_url: http::Uri = server_url
        .parse()
        .map_err(|e| OcsdkError::KubeconfigError(format!("Invalid server URL {}: {}", server_url, e)))?;

    let mut client_config = KConfig::new(cluster_url);
    client_config.default_namespace = config.namespace.clone();
    client_config.accept_invalid_certs = config.insecure_skip_tls_verify;
    client_config.auth_info.token = Some(token.to_string().into());
    Ok(client_config)
}

/// Create a client from the local kubeconfig or in-cluster environment
async fn create_inferred_client(config: &Config) -> Result<Client> {
    let mut c = KConfig::infer()
        .await
        .map_err(|e| OcsdkError::KubeconfigError(format!("Failed to infer config: {}", e)))?;

    debug!("Using inferred cluster URL {}", c.cluster_url);
    c.default_namespace = config.namespace.clone();

    Client::try_from(c)
        .map_err(|e| OcsdkError::KubeconfigError(format!("Failed to create client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogSource, PollSettings};

    fn make_config(insecure: bool) -> Config {
        Config {
            namespace: "zoscb".to_string(),
            server_url: Some("https://api.example.com:6443".to_string()),
            token: Some("sha256~token".to_string()),
            insecure_skip_tls_verify: insecure,
            catalog: CatalogSource::default(),
            poll: PollSettings::default(),
        }
    }

    #[test]
    fn test_token_config() {
        let config = make_config(true);
        let client_config =
            token_config(&config, "https://api.example.com:6443", "sha256~token").unwrap();

        assert_eq!(client_config.cluster_url.host(), Some("api.example.com"));
        assert_eq!(client_config.default_namespace, "zoscb");
        assert!(client_config.accept_invalid_certs);
        assert!(client_config.auth_info.token.is_some());
    }

    #[test]
    fn test_token_config_rejects_bad_url() {
        let config = make_config(false);
        let err = token_config(&config, "not a url", "sha256~token").unwrap_err();
        assert!(matches!(err, OcsdkError::KubeconfigError(_)));
    }
}
