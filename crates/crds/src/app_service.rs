//! AppService CRD
//!
//! Declares a deployable application: its runtime flavor, how it is built,
//! and which optional infrastructure (Kafka, Infinispan) it connects to.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default HTTP port exposed by application containers
pub const DEFAULT_HTTP_PORT: i32 = 8080;

/// Default tag used for images and image stream tags
pub const DEFAULT_IMAGE_TAG: &str = "latest";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "appops.microscaler.io",
    version = "v1alpha1",
    kind = "AppService",
    namespaced,
    status = "AppServiceStatus",
    shortname = "appsvc"
)]
#[serde(rename_all = "camelCase")]
pub struct AppServiceSpec {
    /// Runtime flavor the application is built for
    #[serde(default)]
    pub runtime: RuntimeType,

    /// Number of workload replicas (defaults to 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Container HTTP port (defaults to 8080)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_port: Option<i32>,

    /// Image to deploy instead of the default or the built one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageOverride>,

    /// Extra environment variables for the application container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvEntry>,

    /// Build configuration
    #[serde(default)]
    pub build: BuildSpec,

    /// Kafka connection properties
    #[serde(default)]
    pub kafka: KafkaConnectionProperties,

    /// Infinispan connection properties
    #[serde(default)]
    pub infinispan: InfinispanConnectionProperties,
}

impl AppServiceSpec {
    /// Replica count with the default applied
    pub fn replicas_or_default(&self) -> i32 {
        self.replicas.unwrap_or(1)
    }

    /// HTTP port with the default applied
    pub fn http_port_or_default(&self) -> i32 {
        self.http_port.unwrap_or(DEFAULT_HTTP_PORT)
    }
}

/// Errors raised when an AppService lacks identity metadata
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetadataError {
    /// metadata.name is not set
    #[error("AppService missing metadata.name")]
    MissingName,

    /// metadata.namespace is not set
    #[error("AppService {0} missing metadata.namespace")]
    MissingNamespace(String),
}

impl AppService {
    /// Name and namespace of this AppService
    pub fn identity(&self) -> Result<(&str, &str), MetadataError> {
        let name = self
            .metadata
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(MetadataError::MissingName)?;
        let namespace = self
            .metadata
            .namespace
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| MetadataError::MissingNamespace(name.to_string()))?;
        Ok((name, namespace))
    }
}

/// Runtime flavor of the application
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq, Hash)]
pub enum RuntimeType {
    /// Quarkus, supports native and JVM builds
    #[default]
    #[serde(alias = "quarkus")]
    Quarkus,

    /// Spring Boot, JVM builds only
    #[serde(alias = "springboot")]
    SpringBoot,
}

/// Override for the deployed image
///
/// Unset fields fall back to the defaults (`quay.io`, `microscaler`,
/// the AppService name and `latest`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageOverride {
    /// Registry domain (e.g. "quay.io")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Registry namespace/organisation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Image name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Plain name/value environment entry
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct EnvEntry {
    /// Variable name
    pub name: String,

    /// Variable value
    #[serde(default)]
    pub value: String,
}

/// How the application image is built
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    /// Build a native executable (Quarkus only)
    #[serde(default)]
    pub native: bool,

    /// Git repository to build from; binary builds are used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_source: Option<GitSource>,

    /// Override for the S2I builder image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_s2i: Option<BuilderImageOverride>,

    /// Override for the runtime base image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_runtime: Option<BuilderImageOverride>,

    /// Environment passed to the source build
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvEntry>,
}

/// Git source for the source build
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitSource {
    /// Repository URI
    pub uri: String,

    /// Branch, tag or commit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Sub-directory holding the application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dir: Option<String>,
}

/// Override for a builder image stream tag
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuilderImageOverride {
    /// Image stream name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image stream tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Namespace holding the image stream (defaults to "openshift")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

/// Kafka connection properties
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectionProperties {
    /// Bootstrap address of an externally managed Kafka; takes precedence over `instance`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uri: Option<String>,

    /// Name of a Strimzi Kafka instance in the same namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Infinispan connection properties
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfinispanConnectionProperties {
    /// Whether the client authenticates
    #[serde(default)]
    pub use_auth: bool,

    /// Server list (host:port)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    /// Secret holding the credentials, required when `useAuth` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<SecretCredentialsRef>,
}

/// Reference to the keys of a Secret holding username and password
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SecretCredentialsRef {
    /// Secret name (same namespace)
    pub secret_name: String,

    /// Key holding the username
    pub username_key: String,

    /// Key holding the password
    pub password_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppServiceStatus {
    /// Provisioning state
    #[serde(default)]
    pub state: ProvisioningState,

    /// Error message of the last failed reconciliation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of objects applied by the last successful reconciliation
    #[serde(default)]
    pub resources: u32,

    /// Timestamp of the last state transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reconciled: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
/// Provisioning state
///
/// Serializes as PascalCase but also accepts lowercase values.
#[serde(rename_all = "PascalCase")]
pub enum ProvisioningState {
    /// Not reconciled yet
    #[default]
    #[serde(alias = "pending")]
    Pending,

    /// All resources applied
    #[serde(alias = "provisioned")]
    Provisioned,

    /// Composition or apply failed
    #[serde(alias = "failed")]
    Failed,
}

impl ProvisioningState {
    /// Wire representation of the state
    pub fn as_str(self) -> &'static str {
        match self {
            ProvisioningState::Pending => "Pending",
            ProvisioningState::Provisioned => "Provisioned",
            ProvisioningState::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_spec_defaults_from_minimal_yaml() {
        let spec: AppServiceSpec = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(spec.runtime, RuntimeType::Quarkus);
        assert_eq!(spec.replicas_or_default(), 1);
        assert_eq!(spec.http_port_or_default(), 8080);
        assert!(!spec.build.native);
        assert!(spec.kafka.instance.is_none());
    }

    #[test]
    fn test_runtime_accepts_lowercase() {
        let runtime: RuntimeType = serde_json::from_str("\"springboot\"").unwrap();
        assert_eq!(runtime, RuntimeType::SpringBoot);
        assert_eq!(serde_json::to_string(&RuntimeType::SpringBoot).unwrap(), "\"SpringBoot\"");
    }

    #[test]
    fn test_state_serializes_pascal_case() {
        let status = AppServiceStatus {
            state: ProvisioningState::Provisioned,
            ..Default::default()
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "Provisioned");
        let state: ProvisioningState = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(state, ProvisioningState::Failed);
    }

    #[test]
    fn test_identity_requires_name_and_namespace() {
        let mut app = AppService::new("svc-a", AppServiceSpec::default());
        assert_eq!(
            app.identity(),
            Err(MetadataError::MissingNamespace("svc-a".to_string()))
        );

        app.metadata = ObjectMeta {
            name: Some("svc-a".to_string()),
            namespace: Some("ns1".to_string()),
            ..Default::default()
        };
        assert_eq!(app.identity(), Ok(("svc-a", "ns1")));

        app.metadata.name = None;
        assert_eq!(app.identity(), Err(MetadataError::MissingName));
    }
}
