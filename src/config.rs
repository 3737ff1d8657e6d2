// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{catalog, env, poll};
use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;

/// Catalog source the broker subscription points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    pub name: String,
    pub namespace: String,
    /// Starting CSV of the broker subscription, e.g. `ibm-zoscb.v2.2.2`
    pub csv: String,
}

impl CatalogSource {
    /// Update channel derived from the CSV version: `ibm-zoscb.v2.2.2` -> `v2.2`
    pub fn channel(&self) -> String {
        let version = self
            .csv
            .split_once(".v")
            .map(|(_, v)| v)
            .unwrap_or(self.csv.as_str());
        let mut parts = version.split('.');
        match (parts.next(), parts.next()) {
            (Some(major), Some(minor)) => format!("v{}.{}", major, minor),
            (Some(major), None) => format!("v{}", major),
            _ => format!("v{}", version),
        }
    }
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self {
            name: catalog::DEFAULT_NAME.to_string(),
            namespace: catalog::DEFAULT_NAMESPACE.to_string(),
            csv: catalog::DEFAULT_CSV.to_string(),
        }
    }
}

/// Poll loop parameters shared by the install and cleanup flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Attempts added to the budget for every initiated creation step
    pub attempts_per_step: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(poll::INTERVAL_SECS),
            attempts_per_step: poll::ATTEMPTS_PER_STEP,
        }
    }
}

/// Tool configuration loaded from environment variables
#[derive(Clone)]
pub struct Config {
    /// Namespace the broker and all operator collection objects live in
    pub namespace: String,
    pub server_url: Option<String>,
    pub token: Option<String>,
    pub insecure_skip_tls_verify: bool,
    pub catalog: CatalogSource,
    pub poll: PollSettings,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("namespace", &self.namespace)
            .field("server_url", &self.server_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("catalog", &self.catalog)
            .field("poll", &self.poll)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let namespace = var(env::NAMESPACE)
            .with_context(|| format!("{} environment variable not set", env::NAMESPACE))?;

        let insecure_skip_tls_verify = var(env::INSECURE_SKIP_TLS_VERIFY)
            .map(|v| v.parse::<bool>())
            .transpose()
            .with_context(|| format!("{} must be true or false", env::INSECURE_SKIP_TLS_VERIFY))?
            .unwrap_or(false);

        let defaults = CatalogSource::default();
        let catalog = CatalogSource {
            name: var(env::CATALOG_SOURCE_NAME).unwrap_or(defaults.name),
            namespace: var(env::CATALOG_SOURCE_NAMESPACE).unwrap_or(defaults.namespace),
            csv: var(env::CATALOG_SOURCE_CSV).unwrap_or(defaults.csv),
        };

        let mut poll = PollSettings::default();
        if let Some(secs) = var(env::POLL_INTERVAL_SECS) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("{} must be a number of seconds", env::POLL_INTERVAL_SECS))?;
            poll.interval = Duration::from_secs(secs);
        }
        if let Some(attempts) = var(env::POLL_ATTEMPTS_PER_STEP) {
            poll.attempts_per_step = attempts.parse().with_context(|| {
                format!("{} must be a positive number", env::POLL_ATTEMPTS_PER_STEP)
            })?;
        }

        Ok(Config {
            namespace,
            server_url: var(env::SERVER_URL),
            token: var(env::TOKEN),
            insecure_skip_tls_verify,
            catalog,
            poll,
        })
    }
}
