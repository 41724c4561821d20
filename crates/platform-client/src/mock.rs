//! Mock platform for unit testing
//!
//! Serves configurable lookup results from memory and records every call, so
//! tests can assert both what the pipeline produced and which lookups it
//! reached before stopping.

use crate::error::LookupError;
use crate::lookup::{BrokerTopology, Capability, Credentials, PlatformLookup};
use crds::{AppServiceSpec, KafkaConnectionProperties};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock `PlatformLookup`
///
/// Defaults: anonymous credentials, no broker endpoint, unprovisioned broker
/// topology and every capability served.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    pub(crate) credentials: Arc<Mutex<Result<Credentials, LookupError>>>,
    pub(crate) broker_endpoint: Arc<Mutex<Result<Option<String>, LookupError>>>,
    pub(crate) broker_topology: Arc<Mutex<Result<BrokerTopology, LookupError>>>,
    pub(crate) capabilities: Arc<Mutex<BTreeSet<Capability>>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self {
            credentials: Arc::new(Mutex::new(Ok(Credentials::Anonymous))),
            broker_endpoint: Arc::new(Mutex::new(Ok(None))),
            broker_topology: Arc::new(Mutex::new(Ok(BrokerTopology::default()))),
            capabilities: Arc::new(Mutex::new(Capability::ALL.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the credentials lookup result (for test setup)
    pub fn set_credentials(&self, result: Result<Credentials, LookupError>) {
        *locked(&self.credentials) = result;
    }

    /// Set the broker endpoint lookup result (for test setup)
    pub fn set_broker_endpoint(&self, result: Result<Option<String>, LookupError>) {
        *locked(&self.broker_endpoint) = result;
    }

    /// Set the broker topology lookup result (for test setup)
    pub fn set_broker_topology(&self, result: Result<BrokerTopology, LookupError>) {
        *locked(&self.broker_topology) = result;
    }

    /// Replace the set of served capabilities (for test setup)
    pub fn set_capabilities(&self, capabilities: &[Capability]) {
        *locked(&self.capabilities) = capabilities.iter().copied().collect();
    }

    /// Stop serving one capability (for test setup)
    pub fn remove_capability(&self, capability: Capability) {
        locked(&self.capabilities).remove(&capability);
    }

    /// Names of the lookups called so far, in order
    pub fn calls(&self) -> Vec<String> {
        locked(&self.calls).clone()
    }

    fn record(&self, call: String) {
        locked(&self.calls).push(call);
    }
}

impl PlatformLookup for MockPlatform {
    fn resolve_credentials(
        &self,
        _spec: &AppServiceSpec,
        _namespace: &str,
    ) -> Result<Credentials, LookupError> {
        self.record("resolve_credentials".to_string());
        locked(&self.credentials).clone()
    }

    fn resolve_broker_endpoint(
        &self,
        _props: &KafkaConnectionProperties,
        _namespace: &str,
    ) -> Result<Option<String>, LookupError> {
        self.record("resolve_broker_endpoint".to_string());
        locked(&self.broker_endpoint).clone()
    }

    fn resolve_broker_topology(
        &self,
        _props: &KafkaConnectionProperties,
        _namespace: &str,
    ) -> Result<BrokerTopology, LookupError> {
        self.record("resolve_broker_topology".to_string());
        locked(&self.broker_topology).clone()
    }

    fn probe_capability(&self, capability: Capability) -> bool {
        self.record(format!("probe_capability({capability})"));
        locked(&self.capabilities).contains(&capability)
    }
}
