// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OpenShift web console discovery and resource links

use crate::constants::console;
use crate::kubernetes::lookup::Lookup;
use kube::{
    core::{DynamicObject, GroupVersionKind},
    discovery::ApiResource,
    Api, Client,
};
use tracing::instrument;
use url::Url;

/// Base URL of the OpenShift console, read from the `openshift-console/console` route
#[instrument(skip(client))]
pub async fn console_url(client: &Client) -> Option<Url> {
    let gvk = GroupVersionKind::gvk("route.openshift.io", "v1", "Route");
    let routes: Api<DynamicObject> =
        Api::namespaced_with(client.clone(), console::NAMESPACE, &ApiResource::from_gvk(&gvk));

    let route = Lookup::from_result(routes.get(console::ROUTE_NAME).await).found()?;
    let host = route.data.get("spec")?.get("host")?.as_str()?;
    Url::parse(&format!("https://{}", host)).ok()
}

/// Console link for a namespaced custom resource:
/// `<console>/k8s/ns/<namespace>/<group>~<version>~<kind>/<name>`
pub fn resource_url(
    console: &Url,
    namespace: &str,
    api_version: &str,
    kind: &str,
    name: &str,
) -> Option<Url> {
    let (group, version) = api_version.split_once('/')?;
    let reference = format!("{}~{}~{}", group, version, kind);

    let mut url = console.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(["k8s", "ns", namespace, reference.as_str(), name]);
    Some(url)
}
