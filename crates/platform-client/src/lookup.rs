//! Synchronous lookup interface consumed by the composition pipeline
//!
//! The pipeline never talks to the cluster itself. It asks a `PlatformLookup`
//! for credentials, Kafka details and API capabilities, one blocking call at a
//! time. Production code serves these from a [`PlatformSnapshot`] captured by
//! [`KubePlatformClient`]; tests use `MockPlatform`.
//!
//! [`PlatformSnapshot`]: crate::PlatformSnapshot
//! [`KubePlatformClient`]: crate::KubePlatformClient

use crate::error::LookupError;
use crds::{
    AppServiceSpec, InfinispanConnectionProperties, KafkaConnectionProperties, BUILD_API_GROUP,
    IMAGE_API_GROUP, ROUTE_API_GROUP,
};
use std::fmt;

/// Object kinds that only some clusters serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// route.openshift.io Route
    Route,
    /// image.openshift.io ImageStream
    ImageStream,
    /// build.openshift.io BuildConfig
    BuildConfig,
}

impl Capability {
    /// Every probed capability
    pub const ALL: [Capability; 3] =
        [Capability::Route, Capability::ImageStream, Capability::BuildConfig];

    /// API group that must be served for this capability
    pub fn api_group(self) -> &'static str {
        match self {
            Capability::Route => ROUTE_API_GROUP,
            Capability::ImageStream => IMAGE_API_GROUP,
            Capability::BuildConfig => BUILD_API_GROUP,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Capability::Route => "Route",
            Capability::ImageStream => "ImageStream",
            Capability::BuildConfig => "BuildConfig",
        };
        f.write_str(kind)
    }
}

/// Infinispan credentials an application authenticates with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Credentials {
    /// Authentication disabled
    #[default]
    Anonymous,
    /// Username and password read from a Secret in the application namespace
    Secret {
        /// Secret name
        secret_name: String,
        /// Key holding the username
        username_key: String,
        /// Key holding the password
        password_key: String,
    },
}

impl Credentials {
    /// Credentials declared by the connection properties, before checking the Secret
    pub fn declared(props: &InfinispanConnectionProperties) -> Result<Self, LookupError> {
        if !props.use_auth {
            return Ok(Credentials::Anonymous);
        }
        let reference = props.credentials.as_ref().ok_or_else(|| {
            LookupError::MissingCredentials(
                "useAuth is set but no credentials secret is referenced".to_string(),
            )
        })?;
        Ok(Credentials::Secret {
            secret_name: reference.secret_name.clone(),
            username_key: reference.username_key.clone(),
            password_key: reference.password_key.clone(),
        })
    }
}

/// Kafka cluster name and broker count
///
/// An empty name or a non-positive replica count means the broker is not
/// provisioned yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrokerTopology {
    /// Kafka instance name
    pub name: String,
    /// Number of brokers
    pub replicas: i32,
}

impl BrokerTopology {
    /// Topology of a named Kafka instance
    pub fn new(name: impl Into<String>, replicas: i32) -> Self {
        Self { name: name.into(), replicas }
    }

    /// Whether topics can be provisioned against this broker
    pub fn is_provisioned(&self) -> bool {
        !self.name.is_empty() && self.replicas > 0
    }
}

/// Lookups the composition pipeline performs against the platform
///
/// Calls are synchronous and side-effect free; each may fail independently.
pub trait PlatformLookup: Send + Sync {
    /// Credentials the workload authenticates to Infinispan with
    fn resolve_credentials(
        &self,
        spec: &AppServiceSpec,
        namespace: &str,
    ) -> Result<Credentials, LookupError>;

    /// Kafka bootstrap address, `None` when no broker is configured
    fn resolve_broker_endpoint(
        &self,
        props: &KafkaConnectionProperties,
        namespace: &str,
    ) -> Result<Option<String>, LookupError>;

    /// Kafka cluster name and replica count
    fn resolve_broker_topology(
        &self,
        props: &KafkaConnectionProperties,
        namespace: &str,
    ) -> Result<BrokerTopology, LookupError>;

    /// Whether the platform serves the given object kind
    fn probe_capability(&self, capability: Capability) -> bool;
}
