//! Route builder

use super::service::first_port_name;
use crds::{Route, RoutePort, RouteSpec, RouteTargetReference, KIND_SERVICE};
use k8s_openapi::api::core::v1::Service;

/// Weight of the single route backend
const BACKEND_WEIGHT: i32 = 100;

/// Builds the Route exposing `service`
pub fn new_route(service: &Service) -> Route {
    let name = service.metadata.name.clone().unwrap_or_default();
    let mut route = Route::new(
        &name,
        RouteSpec {
            host: None,
            to: RouteTargetReference {
                kind: KIND_SERVICE.to_string(),
                name: name.clone(),
                weight: Some(BACKEND_WEIGHT),
            },
            port: first_port_name(service).map(|port| RoutePort {
                target_port: port.to_string(),
            }),
        },
    );
    route.metadata.namespace = service.metadata.namespace.clone();
    route.metadata.labels = service.metadata.labels.clone();
    route.metadata.owner_references = service.metadata.owner_references.clone();
    route
}
