//! Pre-fetched lookup results for one AppService
//!
//! The cluster is async; the pipeline is not. A snapshot records the outcome
//! of every lookup up front (failures included) and replays them
//! synchronously, so a failed lookup still surfaces at the pipeline step that
//! consumes it.

use crate::error::LookupError;
use crate::lookup::{BrokerTopology, Capability, Credentials, PlatformLookup};
use crds::{AppServiceSpec, KafkaConnectionProperties};
use std::collections::BTreeSet;

/// Lookup results captured for a single AppService
///
/// The arguments passed to the `PlatformLookup` methods are ignored; a
/// snapshot only answers for the AppService it was captured for.
#[derive(Debug, Clone)]
pub struct PlatformSnapshot {
    credentials: Result<Credentials, LookupError>,
    broker_endpoint: Result<Option<String>, LookupError>,
    broker_topology: Result<BrokerTopology, LookupError>,
    capabilities: BTreeSet<Capability>,
}

impl PlatformSnapshot {
    /// Create a snapshot from already resolved lookups
    pub fn new(
        credentials: Result<Credentials, LookupError>,
        broker_endpoint: Result<Option<String>, LookupError>,
        broker_topology: Result<BrokerTopology, LookupError>,
        capabilities: BTreeSet<Capability>,
    ) -> Self {
        Self {
            credentials,
            broker_endpoint,
            broker_topology,
            capabilities,
        }
    }

    /// Capabilities the cluster served when the snapshot was taken
    pub fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }
}

impl PlatformLookup for PlatformSnapshot {
    fn resolve_credentials(
        &self,
        _spec: &AppServiceSpec,
        _namespace: &str,
    ) -> Result<Credentials, LookupError> {
        self.credentials.clone()
    }

    fn resolve_broker_endpoint(
        &self,
        _props: &KafkaConnectionProperties,
        _namespace: &str,
    ) -> Result<Option<String>, LookupError> {
        self.broker_endpoint.clone()
    }

    fn resolve_broker_topology(
        &self,
        _props: &KafkaConnectionProperties,
        _namespace: &str,
    ) -> Result<BrokerTopology, LookupError> {
        self.broker_topology.clone()
    }

    fn probe_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_replays_failures() {
        let snapshot = PlatformSnapshot::new(
            Ok(Credentials::Anonymous),
            Err(LookupError::NotFound("kafka1".to_string())),
            Ok(BrokerTopology::default()),
            BTreeSet::from([Capability::Route]),
        );
        let props = KafkaConnectionProperties::default();

        assert_eq!(
            snapshot.resolve_credentials(&AppServiceSpec::default(), "ns1"),
            Ok(Credentials::Anonymous)
        );
        // Replayed on every call
        for _ in 0..2 {
            assert_eq!(
                snapshot.resolve_broker_endpoint(&props, "ns1"),
                Err(LookupError::NotFound("kafka1".to_string()))
            );
        }
        assert!(snapshot.probe_capability(Capability::Route));
        assert!(!snapshot.probe_capability(Capability::BuildConfig));
    }
}
