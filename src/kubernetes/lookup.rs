// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tagged outcome of a cluster read.

use tracing::warn;

/// Result of reading an object (or list) from the cluster.
///
/// A 404 is `Absent` rather than an error: the CRD or API version may not be
/// installed yet. Any other failure is kept in `Failed` so callers can still
/// tell "not there" from "could not ask".
#[derive(Debug)]
pub enum Lookup<T> {
    Found(T),
    Absent,
    Failed(kube::Error),
}

impl<T> Lookup<T> {
    pub fn from_result(result: std::result::Result<T, kube::Error>) -> Self {
        match result {
            Ok(value) => Lookup::Found(value),
            Err(kube::Error::Api(err)) if err.code == 404 => Lookup::Absent,
            Err(e) => Lookup::Failed(e),
        }
    }

    /// The found value; failures are logged and treated like absence
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
            Lookup::Failed(e) => {
                warn!("Cluster read failed, treating as absent: {}", e);
                None
            }
        }
    }

    /// True only for a confirmed 404; a failed read is not proof of absence
    pub fn is_absent(&self) -> bool {
        match self {
            Lookup::Absent => true,
            Lookup::Found(_) => false,
            Lookup::Failed(e) => {
                warn!("Cluster read failed, cannot confirm absence: {}", e);
                false
            }
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Absent => Lookup::Absent,
            Lookup::Failed(e) => Lookup::Failed(e),
        }
    }

    /// Strict view: absence is `Ok(None)`, other failures are errors
    pub fn into_result(self) -> crate::error::Result<Option<T>> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Absent => Ok(None),
            Lookup::Failed(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kube::core::ErrorResponse;

    fn api_error(code: u16) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: "boom".to_string(),
            reason: if code == 404 { "NotFound" } else { "InternalError" }.to_string(),
            code,
        })
    }

    #[test]
    fn test_not_found_is_absent() {
        let lookup: Lookup<()> = Lookup::from_result(Err(api_error(404)));
        assert!(lookup.is_absent());
        assert!(lookup.found().is_none());
    }

    #[test]
    fn test_other_errors_are_failures() {
        let lookup: Lookup<()> = Lookup::from_result(Err(api_error(500)));
        assert!(matches!(lookup, Lookup::Failed(_)));
        assert!(!lookup.is_absent());
        assert!(!lookup.is_found());
        assert!(lookup.found().is_none());
    }

    #[test]
    fn test_found_and_map() {
        let lookup = Lookup::from_result(Ok(21)).map(|v| v * 2);
        assert!(lookup.is_found());
        assert_eq!(lookup.found(), Some(42));
    }

    #[test]
    fn test_into_result_is_strict() {
        assert_eq!(Lookup::from_result(Ok(1)).into_result().unwrap(), Some(1));
        assert_eq!(Lookup::<i32>::from_result(Err(api_error(404))).into_result().unwrap(), None);
        assert!(Lookup::<i32>::from_result(Err(api_error(403))).into_result().is_err());
    }
}
