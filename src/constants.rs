// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Environment variable names read by [`crate::config::Config`]
pub mod env {
    pub const SERVER_URL: &str = "OCP_SERVER_URL";
    pub const TOKEN: &str = "OCP_TOKEN";
    pub const NAMESPACE: &str = "OCP_NAMESPACE";
    pub const INSECURE_SKIP_TLS_VERIFY: &str = "OCP_INSECURE_SKIP_TLS_VERIFY";
    pub const CATALOG_SOURCE_NAME: &str = "CATALOGSOURCE_NAME";
    pub const CATALOG_SOURCE_NAMESPACE: &str = "CATALOGSOURCE_NAMESPACE";
    pub const CATALOG_SOURCE_CSV: &str = "CATALOGSOURCE_CSV";
    pub const POLL_INTERVAL_SECS: &str = "POLL_INTERVAL_SECS";
    pub const POLL_ATTEMPTS_PER_STEP: &str = "POLL_ATTEMPTS_PER_STEP";
}

/// Catalog source the broker operator is installed from
pub mod catalog {
    pub const DEFAULT_NAME: &str = "ibm-operator-catalog";
    pub const DEFAULT_NAMESPACE: &str = "openshift-marketplace";
    /// Pinned broker CSV used as the subscription's starting CSV
    pub const DEFAULT_CSV: &str = "ibm-zoscb.v2.2.2";
}

/// z/OS Cloud Broker resources
pub mod broker {
    /// OLM package name, also used as the subscription name
    pub const PACKAGE: &str = "ibm-zoscb";
    /// The broker instance is a singleton with a fixed name
    pub const INSTANCE_NAME: &str = "zoscloudbroker";
    pub const API_GROUP: &str = "zoscb.ibm.com";
    pub const API_VERSION: &str = "v2beta2";
    /// API group of the per-operator custom resources created by sub-operators
    pub const SUBOPERATOR_GROUP: &str = "suboperator.zoscb.ibm.com";
}

/// Poll loop defaults
pub mod poll {
    /// Fixed delay between two poll ticks
    pub const INTERVAL_SECS: u64 = 5;
    /// Attempts granted for every successfully initiated creation step
    pub const ATTEMPTS_PER_STEP: u32 = 25;
}

/// OpenShift web console discovery
pub mod console {
    pub const NAMESPACE: &str = "openshift-console";
    pub const ROUTE_NAME: &str = "console";
}

/// Operator Collection SDK ansible collection
pub mod sdk {
    pub const COLLECTION: &str = "ibm.operator_collection_sdk";
    pub const JINJA2_NATIVE_VAR: &str = "ANSIBLE_JINJA2_NATIVE";
}
