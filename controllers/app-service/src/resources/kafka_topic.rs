//! KafkaTopic builder
//!
//! Requests the event topics every application publishes to. Nothing is
//! requested until the broker reports a name and at least one replica.
//!
//! The topic names are shared by every application in a namespace, so topic
//! objects carry no owner reference and no per-application label.

use super::error::ComposeError;
use super::meta::{self, LABEL_MANAGED_BY, MANAGED_BY_APPOPS};
use crds::{AppService, KafkaTopic, KafkaTopicSpec, STRIMZI_CLUSTER_LABEL};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use platform_client::BrokerTopology;
use std::collections::BTreeMap;

/// Topics provisioned for every application
pub const KAFKA_TOPIC_NAMES: [&str; 4] = [
    "kogito-processinstances-events",
    "kogito-usertaskinstances-events",
    "kogito-processdomain-events",
    "kogito-usertaskdomain-events",
];

/// Partitions per topic
const TOPIC_PARTITIONS: i32 = 1;

/// Builds the topic requests for `topology`, none while it is unprovisioned
pub fn new_kafka_topics(
    app: &AppService,
    topology: &BrokerTopology,
) -> Result<Vec<KafkaTopic>, ComposeError> {
    let (_, namespace) = meta::identity(app)?;
    if !topology.is_provisioned() {
        return Ok(Vec::new());
    }

    let labels = BTreeMap::from([
        (LABEL_MANAGED_BY.to_string(), MANAGED_BY_APPOPS.to_string()),
        (STRIMZI_CLUSTER_LABEL.to_string(), topology.name.clone()),
    ]);

    let topics = KAFKA_TOPIC_NAMES
        .iter()
        .map(|topic_name| {
            let mut topic = KafkaTopic::new(
                topic_name,
                KafkaTopicSpec {
                    topic_name: None,
                    partitions: TOPIC_PARTITIONS,
                    replicas: topology.replicas,
                },
            );
            topic.metadata = ObjectMeta {
                name: Some((*topic_name).to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(labels.clone()),
                ..Default::default()
            };
            topic
        })
        .collect();
    Ok(topics)
}
