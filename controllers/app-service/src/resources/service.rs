//! Service builder

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Builds the Service exposing `deployment`
///
/// Name, namespace, labels and owner are copied from the Deployment; the
/// selector is its pod selector and every named container port becomes a
/// service port targeting it by name.
pub fn new_service(deployment: &Deployment) -> Service {
    let spec = deployment.spec.as_ref();
    let selector = spec.and_then(|s| s.selector.match_labels.clone());
    let ports: Vec<ServicePort> = spec
        .and_then(|s| s.template.spec.as_ref())
        .into_iter()
        .flat_map(|pod| pod.containers.iter())
        .flat_map(|container| container.ports.iter().flatten())
        .filter_map(|port| {
            let name = port.name.clone()?;
            Some(ServicePort {
                name: Some(name.clone()),
                port: port.container_port,
                protocol: port.protocol.clone(),
                target_port: Some(IntOrString::String(name)),
                ..Default::default()
            })
        })
        .collect();

    Service {
        metadata: ObjectMeta {
            name: deployment.metadata.name.clone(),
            namespace: deployment.metadata.namespace.clone(),
            labels: deployment.metadata.labels.clone(),
            owner_references: deployment.metadata.owner_references.clone(),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            selector,
            ports: Some(ports),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Name of the first port of `service`
pub fn first_port_name(service: &Service) -> Option<&str> {
    service
        .spec
        .as_ref()?
        .ports
        .as_ref()?
        .first()?
        .name
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::deployment::new_deployment;
    use crate::test_utils::create_test_app_service;
    use platform_client::Credentials;

    #[test]
    fn test_service_mirrors_deployment() {
        let app = create_test_app_service("svc-a", "ns1");
        let deployment = new_deployment(&app, &Credentials::Anonymous, None, None).unwrap();
        let service = new_service(&deployment);

        assert_eq!(service.metadata.name, deployment.metadata.name);
        assert_eq!(service.metadata.namespace.as_deref(), Some("ns1"));
        assert_eq!(service.metadata.owner_references, deployment.metadata.owner_references);

        let spec = service.spec.as_ref().unwrap();
        assert_eq!(spec.selector, deployment.spec.as_ref().unwrap().selector.match_labels);
        let port = &spec.ports.as_ref().unwrap()[0];
        assert_eq!(port.port, 8080);
        assert_eq!(port.target_port, Some(IntOrString::String("http".to_string())));
        assert_eq!(first_port_name(&service), Some("http"));
    }

    #[test]
    fn test_service_without_ports() {
        let service = new_service(&Deployment::default());
        assert_eq!(first_port_name(&service), None);
        assert_eq!(service.spec.unwrap().ports, Some(Vec::new()));
    }
}
