//! Kubernetes-backed lookups
//!
//! Resolves the external data an AppService depends on by reading Secrets,
//! Strimzi `Kafka` objects and the served API groups.

use crate::error::LookupError;
use crate::lookup::{BrokerTopology, Capability, Credentials};
use crate::snapshot::PlatformSnapshot;
use crds::{AppService, AppServiceSpec, Kafka, KafkaConnectionProperties};
use k8s_openapi::api::core::v1::Secret;
use kube::discovery::Discovery;
use kube::{Api, Client};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Platform client reading from the Kubernetes API
#[derive(Clone)]
pub struct KubePlatformClient {
    client: Client,
}

impl std::fmt::Debug for KubePlatformClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePlatformClient").finish_non_exhaustive()
    }
}

impl KubePlatformClient {
    /// Create a new platform client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Capture every lookup the pipeline needs for `app`
    ///
    /// Per-lookup failures are recorded in the snapshot. Only a failed
    /// capability discovery or missing identity metadata fails the capture,
    /// since without them no step can be decided.
    pub async fn snapshot(&self, app: &AppService) -> Result<PlatformSnapshot, LookupError> {
        let (name, namespace) = app.identity()?;
        debug!("Capturing platform snapshot for AppService {}/{}", namespace, name);

        let capabilities = self.fetch_capabilities().await?;
        let credentials = self.fetch_credentials(&app.spec, namespace).await;
        let broker_endpoint = self.fetch_broker_endpoint(&app.spec.kafka, namespace).await;
        let broker_topology = self.fetch_broker_topology(&app.spec.kafka, namespace).await;

        for (lookup, failed) in [
            ("credentials", credentials.as_ref().err()),
            ("broker endpoint", broker_endpoint.as_ref().err()),
            ("broker topology", broker_topology.as_ref().err()),
        ] {
            if let Some(e) = failed {
                warn!("Lookup of {} for AppService {}/{} failed: {}", lookup, namespace, name, e);
            }
        }

        Ok(PlatformSnapshot::new(credentials, broker_endpoint, broker_topology, capabilities))
    }

    /// Probe which optional API groups the cluster serves
    pub async fn fetch_capabilities(&self) -> Result<BTreeSet<Capability>, LookupError> {
        let groups: Vec<&str> = Capability::ALL.iter().map(|c| c.api_group()).collect();
        let discovery = Discovery::new(self.client.clone())
            .filter(&groups)
            .run()
            .await?;

        let capabilities: BTreeSet<Capability> = Capability::ALL
            .into_iter()
            .filter(|capability| discovery.has_group(capability.api_group()))
            .collect();
        debug!("Discovered platform capabilities: {:?}", capabilities);
        Ok(capabilities)
    }

    /// Resolve Infinispan credentials, checking the referenced Secret
    pub async fn fetch_credentials(
        &self,
        spec: &AppServiceSpec,
        namespace: &str,
    ) -> Result<Credentials, LookupError> {
        let credentials = Credentials::declared(&spec.infinispan)?;
        if let Credentials::Secret {
            secret_name,
            username_key,
            password_key,
        } = &credentials
        {
            let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
            let secret = secrets.get(secret_name).await?;
            let data = secret.data.unwrap_or_default();
            let string_data = secret.string_data.unwrap_or_default();
            for key in [username_key, password_key] {
                if !data.contains_key(key) && !string_data.contains_key(key) {
                    return Err(LookupError::MissingKey {
                        secret: secret_name.clone(),
                        key: key.clone(),
                    });
                }
            }
        }
        Ok(credentials)
    }

    /// Resolve the Kafka bootstrap address
    ///
    /// `externalUri` wins over `instance`. A named instance that has not
    /// published a plain listener yet is an error.
    pub async fn fetch_broker_endpoint(
        &self,
        props: &KafkaConnectionProperties,
        namespace: &str,
    ) -> Result<Option<String>, LookupError> {
        if let Some(uri) = props.external_uri.as_ref().filter(|u| !u.is_empty()) {
            return Ok(Some(uri.clone()));
        }
        let Some(instance) = props.instance.as_deref().filter(|i| !i.is_empty()) else {
            return Ok(None);
        };
        let kafka = self.get_kafka(instance, namespace).await?;
        kafka.plain_bootstrap_servers().map(Some).ok_or_else(|| {
            LookupError::NotFound(format!("Kafka {namespace}/{instance} has no plain listener yet"))
        })
    }

    /// Resolve the Kafka instance name and broker count
    ///
    /// Returns an empty topology when no instance is referenced.
    pub async fn fetch_broker_topology(
        &self,
        props: &KafkaConnectionProperties,
        namespace: &str,
    ) -> Result<BrokerTopology, LookupError> {
        let Some(instance) = props.instance.as_deref().filter(|i| !i.is_empty()) else {
            return Ok(BrokerTopology::default());
        };
        let kafka = self.get_kafka(instance, namespace).await?;
        Ok(BrokerTopology::new(instance, kafka.spec.kafka.replicas))
    }

    async fn get_kafka(&self, name: &str, namespace: &str) -> Result<Kafka, LookupError> {
        let kafkas: Api<Kafka> = Api::namespaced(self.client.clone(), namespace);
        Ok(kafkas.get(name).await?)
    }
}
