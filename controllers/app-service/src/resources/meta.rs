//! Default metadata stamped on every rendered object

use super::error::ComposeError;
use crds::AppService;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::Resource;
use std::collections::BTreeMap;

/// Label carrying the application name, also used as pod selector
pub const LABEL_APP: &str = "app";

/// Label marking objects owned by this controller
pub const LABEL_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Value of [`LABEL_MANAGED_BY`]
pub const MANAGED_BY_APPOPS: &str = "appops";

/// Name and namespace of the AppService, as an `InvalidSpec` on failure
pub fn identity(app: &AppService) -> Result<(&str, &str), ComposeError> {
    app.identity().map_err(|e| ComposeError::InvalidSpec(e.to_string()))
}

/// Selector labels of the application pods
pub fn selector_labels(app_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(LABEL_APP.to_string(), app_name.to_string())])
}

/// Labels stamped on every object of the application
pub fn default_labels(app_name: &str) -> BTreeMap<String, String> {
    let mut labels = selector_labels(app_name);
    labels.insert(LABEL_MANAGED_BY.to_string(), MANAGED_BY_APPOPS.to_string());
    labels
}

/// Metadata for an object named `object_name` belonging to `app`
///
/// Sets namespace, default labels and, when the AppService has been
/// persisted (has a uid), a controller owner reference.
pub fn object_meta(app: &AppService, object_name: &str) -> Result<ObjectMeta, ComposeError> {
    let (app_name, namespace) = identity(app)?;
    Ok(ObjectMeta {
        name: Some(object_name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(default_labels(app_name)),
        owner_references: app.controller_owner_ref(&()).map(|owner| vec![owner]),
        ..Default::default()
    })
}
