//! Kafka (kafka.strimzi.io/v1beta2), read-only view

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Listener type carrying the unencrypted bootstrap address
pub const PLAIN_LISTENER: &str = "plain";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "kafka.strimzi.io",
    version = "v1beta2",
    kind = "Kafka",
    namespaced,
    status = "KafkaStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct KafkaSpec {
    /// Broker cluster settings
    #[serde(default)]
    pub kafka: KafkaClusterSpec,
}

/// Broker cluster settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct KafkaClusterSpec {
    /// Number of broker pods
    #[serde(default)]
    pub replicas: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KafkaStatus {
    /// Listeners published by the operator
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub listeners: Vec<ListenerStatus>,
}

/// Published listener
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatus {
    /// Listener type or name (e.g. "plain", "tls")
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub listener_type: Option<String>,

    /// Listener name (newer Strimzi releases)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Comma separated bootstrap servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_servers: Option<String>,

    /// Individual addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addresses: Vec<ListenerAddress>,
}

/// Host and port of a listener
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct ListenerAddress {
    /// Host name
    pub host: String,

    /// Port
    pub port: i32,
}

impl Kafka {
    /// Bootstrap address of the plain listener, if the operator published one
    pub fn plain_bootstrap_servers(&self) -> Option<String> {
        let listener = self.status.as_ref()?.listeners.iter().find(|l| {
            l.listener_type.as_deref() == Some(PLAIN_LISTENER)
                || l.name.as_deref() == Some(PLAIN_LISTENER)
        })?;
        if let Some(servers) = listener.bootstrap_servers.as_ref().filter(|s| !s.is_empty()) {
            return Some(servers.clone());
        }
        listener
            .addresses
            .first()
            .map(|address| format!("{}:{}", address.host, address.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kafka_with(listeners: Vec<ListenerStatus>) -> Kafka {
        let mut kafka = Kafka::new("kafka1", KafkaSpec::default());
        kafka.status = Some(KafkaStatus { listeners });
        kafka
    }

    #[test]
    fn test_plain_bootstrap_prefers_bootstrap_servers() {
        let kafka = kafka_with(vec![
            ListenerStatus {
                listener_type: Some("tls".to_string()),
                bootstrap_servers: Some("kafka1-kafka-bootstrap:9093".to_string()),
                ..Default::default()
            },
            ListenerStatus {
                listener_type: Some("plain".to_string()),
                bootstrap_servers: Some("kafka1-kafka-bootstrap:9092".to_string()),
                ..Default::default()
            },
        ]);
        assert_eq!(kafka.plain_bootstrap_servers().as_deref(), Some("kafka1-kafka-bootstrap:9092"));
    }

    #[test]
    fn test_plain_bootstrap_falls_back_to_address() {
        let kafka = kafka_with(vec![ListenerStatus {
            name: Some("plain".to_string()),
            addresses: vec![ListenerAddress {
                host: "kafka1-kafka-bootstrap.ns1.svc".to_string(),
                port: 9092,
            }],
            ..Default::default()
        }]);
        assert_eq!(
            kafka.plain_bootstrap_servers().as_deref(),
            Some("kafka1-kafka-bootstrap.ns1.svc:9092")
        );
    }

    #[test]
    fn test_plain_bootstrap_missing_without_status() {
        let kafka = Kafka::new("kafka1", KafkaSpec::default());
        assert!(kafka.plain_bootstrap_servers().is_none());
    }
}
