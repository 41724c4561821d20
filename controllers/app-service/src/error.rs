//! Controller-specific error types.
//!
//! Errors of the AppService controller binary. Composition and lookup
//! failures keep their own types and are wrapped here.

use crate::resources::ComposeError;
use kube::Error as KubeError;
use platform_client::LookupError;
use thiserror::Error;

/// Errors that can occur in the AppService Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Platform lookup failed before composition started
    #[error("Platform lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Desired state could not be composed
    #[error("Composition failed: {0}")]
    Compose(#[from] ComposeError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
