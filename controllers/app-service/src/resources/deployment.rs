//! Deployment builder
//!
//! The workload runs a single container named after the application. Its
//! environment carries the Kafka bootstrap address and Infinispan client
//! settings under the names the runtime flavor expects.

use super::error::ComposeError;
use super::images;
use super::meta;
use crds::{AppService, ImageStream, RuntimeType, IMAGE_TRIGGERS_ANNOTATION};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, PodSpec, PodTemplateSpec, SecretKeySelector,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use platform_client::Credentials;
use std::collections::BTreeMap;

/// Name of the container port
pub const HTTP_PORT_NAME: &str = "http";

/// Env var carrying the Kafka bootstrap address
pub const KAFKA_BOOTSTRAP_ENV: &str = "KAFKA_BOOTSTRAP_SERVERS";

/// Infinispan client env var names of one runtime flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfinispanEnvNames {
    /// Server list
    pub server_list: &'static str,
    /// Whether to authenticate
    pub use_auth: &'static str,
    /// Username
    pub username: &'static str,
    /// Password
    pub password: &'static str,
}

const QUARKUS_INFINISPAN_ENV: InfinispanEnvNames = InfinispanEnvNames {
    server_list: "QUARKUS_INFINISPAN_CLIENT_SERVER_LIST",
    use_auth: "QUARKUS_INFINISPAN_CLIENT_USE_AUTH",
    username: "QUARKUS_INFINISPAN_CLIENT_AUTH_USERNAME",
    password: "QUARKUS_INFINISPAN_CLIENT_AUTH_PASSWORD",
};

const SPRING_BOOT_INFINISPAN_ENV: InfinispanEnvNames = InfinispanEnvNames {
    server_list: "INFINISPAN_REMOTE_SERVER_LIST",
    use_auth: "INFINISPAN_REMOTE_USE_AUTH",
    username: "INFINISPAN_REMOTE_AUTH_USER_NAME",
    password: "INFINISPAN_REMOTE_AUTH_PASSWORD",
};

/// Infinispan env var names for a runtime flavor
pub fn infinispan_env_names(runtime: RuntimeType) -> InfinispanEnvNames {
    match runtime {
        RuntimeType::Quarkus => QUARKUS_INFINISPAN_ENV,
        RuntimeType::SpringBoot => SPRING_BOOT_INFINISPAN_ENV,
    }
}

/// Builds the application Deployment
///
/// `credentials` and `broker_endpoint` come from the platform lookups; the
/// image stream, when present, becomes the image source of the container.
pub fn new_deployment(
    app: &AppService,
    credentials: &Credentials,
    broker_endpoint: Option<&str>,
    image_stream: Option<&ImageStream>,
) -> Result<Deployment, ComposeError> {
    let (name, _) = meta::identity(app)?;
    let labels = meta::selector_labels(name);
    let image = images::deployment_image(app, name, image_stream);

    let mut env: Vec<EnvVar> = app.spec.env.iter().map(|e| plain_env(&e.name, &e.value)).collect();
    if let Some(endpoint) = broker_endpoint {
        env.push(plain_env(KAFKA_BOOTSTRAP_ENV, endpoint));
    }
    env.extend(infinispan_env(app, credentials));

    let mut metadata = meta::object_meta(app, name)?;
    if image_stream.is_some() {
        metadata.annotations = Some(BTreeMap::from([(
            IMAGE_TRIGGERS_ANNOTATION.to_string(),
            image_trigger_annotation(name, &image),
        )]));
    }

    Ok(Deployment {
        metadata,
        spec: Some(DeploymentSpec {
            replicas: Some(app.spec.replicas_or_default()),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: name.to_string(),
                        image: Some(image),
                        ports: Some(vec![ContainerPort {
                            name: Some(HTTP_PORT_NAME.to_string()),
                            container_port: app.spec.http_port_or_default(),
                            protocol: Some("TCP".to_string()),
                            ..Default::default()
                        }]),
                        env: (!env.is_empty()).then_some(env),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    })
}

fn plain_env(name: &str, value: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

fn secret_env(name: &str, secret_name: &str, key: &str) -> EnvVar {
    EnvVar {
        name: name.to_string(),
        value_from: Some(EnvVarSource {
            secret_key_ref: Some(SecretKeySelector {
                name: secret_name.to_string(),
                key: key.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Infinispan client env, empty when the application uses no data grid
fn infinispan_env(app: &AppService, credentials: &Credentials) -> Vec<EnvVar> {
    let names = infinispan_env_names(app.spec.runtime);
    let props = &app.spec.infinispan;
    if props.uri.is_none() && *credentials == Credentials::Anonymous {
        return Vec::new();
    }

    let mut env = Vec::new();
    if let Some(uri) = &props.uri {
        env.push(plain_env(names.server_list, uri));
    }
    match credentials {
        Credentials::Anonymous => env.push(plain_env(names.use_auth, "false")),
        Credentials::Secret {
            secret_name,
            username_key,
            password_key,
        } => {
            env.push(plain_env(names.use_auth, "true"));
            env.push(secret_env(names.username, secret_name, username_key));
            env.push(secret_env(names.password, secret_name, password_key));
        }
    }
    env
}

/// `image.openshift.io/triggers` value pointing the container at its stream tag
fn image_trigger_annotation(container: &str, stream_tag: &str) -> String {
    serde_json::json!([{
        "from": {
            "kind": crds::KIND_IMAGE_STREAM_TAG,
            "name": stream_tag,
        },
        "fieldPath": format!("spec.template.spec.containers[?(@.name==\"{container}\")].image"),
    }])
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::image_stream::new_image_stream;
    use crate::test_utils::create_test_app_service;
    use crds::{EnvEntry, SecretCredentialsRef};

    fn container(deployment: &Deployment) -> &Container {
        &deployment.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
    }

    fn env_names(deployment: &Deployment) -> Vec<String> {
        container(deployment)
            .env
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn test_minimal_deployment() {
        let app = create_test_app_service("svc-a", "ns1");
        let deployment = new_deployment(&app, &Credentials::Anonymous, None, None).unwrap();

        assert_eq!(deployment.metadata.name.as_deref(), Some("svc-a"));
        assert_eq!(deployment.metadata.namespace.as_deref(), Some("ns1"));
        assert!(deployment.metadata.annotations.is_none());

        let spec = deployment.spec.as_ref().unwrap();
        assert_eq!(spec.replicas, Some(1));
        assert_eq!(spec.selector.match_labels, Some(meta::selector_labels("svc-a")));

        let container = container(&deployment);
        assert_eq!(container.name, "svc-a");
        assert_eq!(container.image.as_deref(), Some("quay.io/microscaler/svc-a:latest"));
        let port = &container.ports.as_ref().unwrap()[0];
        assert_eq!(port.name.as_deref(), Some("http"));
        assert_eq!(port.container_port, 8080);
        assert!(container.env.is_none());
    }

    #[test]
    fn test_env_order_user_then_kafka_then_infinispan() {
        let mut app = create_test_app_service("svc-a", "ns1");
        app.spec.env = vec![EnvEntry {
            name: "LOG_LEVEL".to_string(),
            value: "debug".to_string(),
        }];
        app.spec.infinispan.uri = Some("infinispan:11222".to_string());

        let deployment = new_deployment(
            &app,
            &Credentials::Anonymous,
            Some("kafka1-kafka-bootstrap:9092"),
            None,
        )
        .unwrap();
        assert_eq!(
            env_names(&deployment),
            vec![
                "LOG_LEVEL",
                "KAFKA_BOOTSTRAP_SERVERS",
                "QUARKUS_INFINISPAN_CLIENT_SERVER_LIST",
                "QUARKUS_INFINISPAN_CLIENT_USE_AUTH",
            ]
        );
        let env = container(&deployment).env.clone().unwrap();
        assert_eq!(env[1].value.as_deref(), Some("kafka1-kafka-bootstrap:9092"));
        assert_eq!(env[3].value.as_deref(), Some("false"));
    }

    #[test]
    fn test_spring_boot_credentials_use_secret_refs() {
        let mut app = create_test_app_service("svc-a", "ns1");
        app.spec.runtime = RuntimeType::SpringBoot;
        app.spec.infinispan.use_auth = true;
        app.spec.infinispan.credentials = Some(SecretCredentialsRef {
            secret_name: "dg-creds".to_string(),
            username_key: "user".to_string(),
            password_key: "pass".to_string(),
        });
        let credentials = Credentials::Secret {
            secret_name: "dg-creds".to_string(),
            username_key: "user".to_string(),
            password_key: "pass".to_string(),
        };

        let deployment = new_deployment(&app, &credentials, None, None).unwrap();
        assert_eq!(
            env_names(&deployment),
            vec![
                "INFINISPAN_REMOTE_USE_AUTH",
                "INFINISPAN_REMOTE_AUTH_USER_NAME",
                "INFINISPAN_REMOTE_AUTH_PASSWORD",
            ]
        );
        let env = container(&deployment).env.clone().unwrap();
        let password = env[2].value_from.as_ref().unwrap().secret_key_ref.as_ref().unwrap();
        assert_eq!(password.name, "dg-creds");
        assert_eq!(password.key, "pass");
        assert!(env[2].value.is_none());
    }

    #[test]
    fn test_image_stream_sets_image_and_trigger() {
        let app = create_test_app_service("svc-a", "ns1");
        let image_stream = new_image_stream(&app).unwrap();
        let deployment =
            new_deployment(&app, &Credentials::Anonymous, None, Some(&image_stream)).unwrap();

        assert_eq!(container(&deployment).image.as_deref(), Some("svc-a:latest"));
        let annotations = deployment.metadata.annotations.unwrap();
        let triggers: serde_json::Value =
            serde_json::from_str(&annotations[IMAGE_TRIGGERS_ANNOTATION]).unwrap();
        assert_eq!(triggers[0]["from"]["kind"], "ImageStreamTag");
        assert_eq!(triggers[0]["from"]["name"], "svc-a:latest");
        assert_eq!(
            triggers[0]["fieldPath"],
            "spec.template.spec.containers[?(@.name==\"svc-a\")].image"
        );
    }

    #[test]
    fn test_replicas_and_port_from_spec() {
        let mut app = create_test_app_service("svc-a", "ns1");
        app.spec.replicas = Some(3);
        app.spec.http_port = Some(9090);
        let deployment = new_deployment(&app, &Credentials::Anonymous, None, None).unwrap();

        assert_eq!(deployment.spec.as_ref().unwrap().replicas, Some(3));
        assert_eq!(container(&deployment).ports.as_ref().unwrap()[0].container_port, 9090);
    }
}
