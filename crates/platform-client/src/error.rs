//! Platform lookup errors

use crds::MetadataError;
use thiserror::Error;

/// Errors that can occur while resolving external data for an AppService
///
/// Cloneable so a captured snapshot can hand the same failure to every
/// caller that asks for it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Referenced object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Secret exists but lacks a required key
    #[error("Secret {secret} has no key {key}")]
    MissingKey {
        /// Secret name
        secret: String,
        /// Missing key
        key: String,
    },

    /// Authentication is enabled but no credentials are referenced
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// AppService lacks identity metadata
    #[error("Invalid AppService: {0}")]
    Metadata(#[from] MetadataError),

    /// Kubernetes API request failed
    #[error("Kubernetes API error: {0}")]
    Api(String),
}

impl From<kube::Error> for LookupError {
    fn from(err: kube::Error) -> Self {
        match err {
            kube::Error::Api(response) if response.code == 404 => {
                LookupError::NotFound(response.message)
            }
            other => LookupError::Api(other.to_string()),
        }
    }
}
