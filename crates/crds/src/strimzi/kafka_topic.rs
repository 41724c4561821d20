//! KafkaTopic (kafka.strimzi.io/v1beta2)

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label binding a topic to its Kafka cluster
pub const STRIMZI_CLUSTER_LABEL: &str = "strimzi.io/cluster";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "kafka.strimzi.io",
    version = "v1beta2",
    kind = "KafkaTopic",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct KafkaTopicSpec {
    /// Topic name in Kafka; the object name when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,

    /// Number of partitions
    pub partitions: i32,

    /// Replication factor
    pub replicas: i32,
}
