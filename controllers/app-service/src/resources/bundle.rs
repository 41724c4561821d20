//! Composition output

use super::error::ComposeError;
use crds::{BuildConfig, ImageStream, KafkaTopic, Route};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;

/// Every object rendered for one AppService
///
/// Each slot is written by exactly one pipeline step. Slots of steps the
/// platform cannot serve stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppServiceResources {
    /// Application image stream
    pub image_stream: Option<ImageStream>,
    /// Source build
    pub build_config_s2i: Option<BuildConfig>,
    /// Stream receiving the source build output
    pub builder_image_stream: Option<ImageStream>,
    /// Runtime build
    pub build_config_runtime: Option<BuildConfig>,
    /// Workload
    pub deployment: Option<Deployment>,
    /// Network exposure
    pub service: Option<Service>,
    /// Ingress route
    pub route: Option<Route>,
    /// Topic requests
    pub kafka_topics: Vec<KafkaTopic>,
}

impl AppServiceResources {
    /// True when no object was rendered
    pub fn is_empty(&self) -> bool {
        self.resource_count() == 0
    }

    /// Number of rendered objects
    pub fn resource_count(&self) -> usize {
        [
            self.image_stream.is_some(),
            self.build_config_s2i.is_some(),
            self.builder_image_stream.is_some(),
            self.build_config_runtime.is_some(),
            self.deployment.is_some(),
            self.service.is_some(),
            self.route.is_some(),
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
            + self.kafka_topics.len()
    }
}

/// Result of one composition run
///
/// `resources` holds what the steps before the failure produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composed {
    /// Objects rendered so far
    pub resources: AppServiceResources,
    /// First error, if any
    pub error: Option<ComposeError>,
}

impl Composed {
    /// The complete bundle, or the first error (discarding partial output)
    pub fn into_result(self) -> Result<AppServiceResources, ComposeError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.resources),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bundle() {
        let resources = AppServiceResources::default();
        assert!(resources.is_empty());
        assert_eq!(resources.resource_count(), 0);
    }

    #[test]
    fn test_resource_count_includes_topics() {
        let resources = AppServiceResources {
            deployment: Some(Deployment::default()),
            service: Some(Service::default()),
            kafka_topics: vec![
                KafkaTopic::new("a", Default::default()),
                KafkaTopic::new("b", Default::default()),
            ],
            ..Default::default()
        };
        assert!(!resources.is_empty());
        assert_eq!(resources.resource_count(), 4);
    }

    #[test]
    fn test_into_result_discards_partial_output() {
        let composed = Composed {
            resources: AppServiceResources {
                deployment: Some(Deployment::default()),
                ..Default::default()
            },
            error: Some(ComposeError::InvalidSpec("bad".to_string())),
        };
        assert_eq!(composed.into_result(), Err(ComposeError::InvalidSpec("bad".to_string())));

        let composed = Composed::default();
        assert_eq!(composed.into_result(), Ok(AppServiceResources::default()));
    }
}
