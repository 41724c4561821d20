//! Server-side apply of composed objects.

use crate::error::ControllerError;
use crate::resources::AppServiceResources;
use kube::api::{Patch, PatchParams};
use kube::core::NamespaceResourceScope;
use kube::{Api, Client, Resource, ResourceExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

/// Applies rendered objects with a fixed field manager
#[derive(Clone)]
pub struct Applier {
    client: Client,
    field_manager: String,
}

impl std::fmt::Debug for Applier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Applier")
            .field("field_manager", &self.field_manager)
            .finish_non_exhaustive()
    }
}

impl Applier {
    /// Creates a new applier.
    pub fn new(client: Client, field_manager: String) -> Self {
        Self { client, field_manager }
    }

    /// Apply every object of `resources`, returning how many were applied
    ///
    /// Objects are applied in dependency order and the first failure aborts
    /// the rest.
    pub async fn apply_bundle(
        &self,
        resources: &AppServiceResources,
    ) -> Result<u32, ControllerError> {
        let mut applied = 0;
        for image_stream in resources.image_stream.iter().chain(&resources.builder_image_stream) {
            applied += self.apply(image_stream).await?;
        }
        let build_configs =
            resources.build_config_s2i.iter().chain(&resources.build_config_runtime);
        for build_config in build_configs {
            applied += self.apply(build_config).await?;
        }
        if let Some(deployment) = &resources.deployment {
            applied += self.apply(deployment).await?;
        }
        if let Some(service) = &resources.service {
            applied += self.apply(service).await?;
        }
        if let Some(route) = &resources.route {
            applied += self.apply(route).await?;
        }
        for topic in &resources.kafka_topics {
            applied += self.apply(topic).await?;
        }
        Ok(applied)
    }

    async fn apply<K>(&self, object: &K) -> Result<u32, ControllerError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
        K::DynamicType: Default,
    {
        let kind = K::kind(&Default::default()).into_owned();
        let name = object.name_any();
        let namespace = object.namespace().ok_or_else(|| {
            ControllerError::InvalidConfig(format!("{kind} {name} has no namespace"))
        })?;

        let api: Api<K> = Api::namespaced(self.client.clone(), &namespace);
        let params = PatchParams::apply(&self.field_manager).force();
        api.patch(&name, &params, &Patch::Apply(object)).await?;
        debug!("Applied {} {}/{}", kind, namespace, name);
        Ok(1)
    }
}
