// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod log download

use crate::error::Result;
use crate::kubernetes::cluster::ClusterClient;
use kube::ResourceExt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Local file name a container log is written to
pub fn log_file_name(pod: &str, container: Option<&str>) -> String {
    match container {
        Some(container) => format!("{}-{}.log", pod, container),
        None => format!("{}.log", pod),
    }
}

/// Write the logs of a pod container into `output_dir`.
///
/// Returns `None` when the pod (or its logs) no longer exists.
#[instrument(skip(client, output_dir), fields(namespace = %client.namespace()))]
pub async fn download_container_logs(
    client: &ClusterClient,
    pod: &str,
    container: Option<&str>,
    output_dir: &Path,
) -> Result<Option<PathBuf>> {
    let Some(logs) = client.pod_logs(pod, container).await.found() else {
        warn!("No logs available for pod {}", pod);
        return Ok(None);
    };

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(log_file_name(pod, container));
    tokio::fs::write(&path, logs).await?;

    info!("Wrote logs of pod {} to {}", pod, path.display());
    Ok(Some(path))
}

/// Download the logs of every pod matching `label_selector`, skipping pods that vanished
#[instrument(skip(client, output_dir), fields(namespace = %client.namespace()))]
pub async fn download_logs_by_selector(
    client: &ClusterClient,
    label_selector: &str,
    container: Option<&str>,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let pods = client
        .list_pods(Some(label_selector))
        .await
        .found()
        .unwrap_or_default();

    let mut paths = Vec::with_capacity(pods.len());
    for pod in pods {
        if let Some(path) =
            download_container_logs(client, &pod.name_any(), container, output_dir).await?
        {
            paths.push(path);
        }
    }
    Ok(paths)
}
