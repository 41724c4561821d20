//! Composition errors
//!
//! Returned verbatim by the pipeline so callers can branch on the variant.

use platform_client::LookupError;
use std::fmt;
use thiserror::Error;

/// Object kinds (or groups) produced by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Tracked application image
    ImageStream,
    /// Source build (plus its output stream)
    SourceBuild,
    /// Runtime build
    RuntimeBuild,
    /// Workload
    Deployment,
    /// Network exposure
    Service,
    /// Ingress route
    Route,
    /// Topic provisioning requests
    KafkaTopics,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ResourceKind::ImageStream => "ImageStream",
            ResourceKind::SourceBuild => "source BuildConfig",
            ResourceKind::RuntimeBuild => "runtime BuildConfig",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Service => "Service",
            ResourceKind::Route => "Route",
            ResourceKind::KafkaTopics => "KafkaTopics",
        };
        f.write_str(kind)
    }
}

/// External data a builder depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Infinispan credentials
    Credentials,
    /// Kafka bootstrap address
    BrokerEndpoint,
    /// Kafka name and replica count
    BrokerTopology,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependency = match self {
            Dependency::Credentials => "credentials",
            Dependency::BrokerEndpoint => "broker endpoint",
            Dependency::BrokerTopology => "broker topology",
        };
        f.write_str(dependency)
    }
}

/// Errors that stop a composition run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ComposeError {
    /// An external lookup failed
    #[error("{dependency} unavailable: {source}")]
    DependencyUnavailable {
        /// Which lookup failed
        dependency: Dependency,
        /// Lookup failure
        source: LookupError,
    },

    /// Runtime build requested without a usable source build
    #[error("Missing upstream build: {0}")]
    MissingUpstreamBuild(String),

    /// A builder ran before the object it derives from was built
    #[error("{kind} requires a {dependency}, but none was built")]
    InvalidReference {
        /// Kind being built
        kind: ResourceKind,
        /// Kind it derives from
        dependency: ResourceKind,
    },

    /// The AppService cannot be rendered as declared
    #[error("Invalid AppService spec: {0}")]
    InvalidSpec(String),
}

impl ComposeError {
    /// Wrap a lookup failure for the given dependency
    pub fn unavailable(dependency: Dependency) -> impl FnOnce(LookupError) -> Self {
        move |source| ComposeError::DependencyUnavailable { dependency, source }
    }
}
