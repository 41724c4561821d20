//! Test utilities for unit testing the pipeline and reconciler
//!
//! Helpers for creating test AppServices and preconfigured mock platforms.

use crds::{AppService, AppServiceSpec, KafkaConnectionProperties};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use platform_client::{BrokerTopology, MockPlatform};

/// Helper to create a persisted AppService with default spec
pub fn create_test_app_service(name: &str, namespace: &str) -> AppService {
    AppService {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some(format!("{name}-uid")),
            ..Default::default()
        },
        spec: AppServiceSpec::default(),
        status: None,
    }
}

/// Helper to create an AppService bound to a Strimzi Kafka instance
pub fn create_test_app_service_with_kafka(
    name: &str,
    namespace: &str,
    kafka_instance: &str,
) -> AppService {
    let mut app = create_test_app_service(name, namespace);
    app.spec.kafka = KafkaConnectionProperties {
        external_uri: None,
        instance: Some(kafka_instance.to_string()),
    };
    app
}

/// Mock platform serving every capability and a ready Kafka instance
pub fn create_test_platform_with_kafka(kafka_instance: &str, replicas: i32) -> MockPlatform {
    let platform = MockPlatform::new();
    platform.set_broker_endpoint(Ok(Some(format!("{kafka_instance}-kafka-bootstrap:9092"))));
    platform.set_broker_topology(Ok(BrokerTopology::new(kafka_instance, replicas)));
    platform
}
