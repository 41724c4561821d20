//! Image selection
//!
//! Picks the deployed image and the builder/runtime base images. Base images
//! come from a table keyed by (build type, runtime); combinations missing
//! from the table are rejected.

use super::error::ComposeError;
use crds::{
    AppService, BuildSpec, BuilderImageOverride, ImageStream, ObjectReference, RuntimeType,
    DEFAULT_IMAGE_TAG,
};

/// Registry used when no image override is given
pub const DEFAULT_IMAGE_DOMAIN: &str = "quay.io";

/// Registry namespace used when no image override is given
pub const DEFAULT_IMAGE_NAMESPACE: &str = "microscaler";

/// Namespace holding the builder image streams
pub const DEFAULT_BUILDER_IMAGE_NAMESPACE: &str = "openshift";

/// Label recording which phase a BuildConfig belongs to
pub const LABEL_BUILD_TYPE: &str = "appops.microscaler.io/buildtype";

/// Build phase and flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    /// Source-to-image build compiling from source
    S2i,
    /// Runtime image for a native Quarkus executable or a Spring Boot jar
    Runtime,
    /// Runtime image running Quarkus on a JVM
    RuntimeJvm,
}

impl BuildType {
    /// Build type of the runtime phase
    ///
    /// Only Quarkus has a separate JVM flavor; Spring Boot ignores `native`.
    pub fn runtime_for(build: &BuildSpec, runtime: RuntimeType) -> Self {
        if runtime == RuntimeType::Quarkus && !build.native {
            BuildType::RuntimeJvm
        } else {
            BuildType::Runtime
        }
    }

    /// Value of the build type label
    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::S2i => "S2I",
            BuildType::Runtime => "Runtime",
            BuildType::RuntimeJvm => "RuntimeJvm",
        }
    }
}

/// Default image stream for a (build type, runtime) pair
pub fn default_builder_image(build_type: BuildType, runtime: RuntimeType) -> Option<&'static str> {
    match (build_type, runtime) {
        (BuildType::S2i, RuntimeType::Quarkus) => Some("kogito-quarkus-ubi8-s2i"),
        (BuildType::S2i, RuntimeType::SpringBoot) => Some("kogito-springboot-ubi8-s2i"),
        (BuildType::Runtime, RuntimeType::Quarkus) => Some("kogito-quarkus-ubi8"),
        (BuildType::Runtime, RuntimeType::SpringBoot) => Some("kogito-springboot-ubi8"),
        (BuildType::RuntimeJvm, RuntimeType::Quarkus) => Some("kogito-quarkus-jvm-ubi8"),
        (BuildType::RuntimeJvm, RuntimeType::SpringBoot) => None,
    }
}

/// Image stream tag a build of the given type starts from
///
/// Override fields replace the table defaults one by one.
pub fn builder_image(
    build_type: BuildType,
    runtime: RuntimeType,
    image_override: Option<&BuilderImageOverride>,
) -> Result<ObjectReference, ComposeError> {
    let default_name = default_builder_image(build_type, runtime).ok_or_else(|| {
        ComposeError::InvalidSpec(format!(
            "no {} base image for runtime {:?}",
            build_type.as_str(),
            runtime
        ))
    })?;
    let image_override = image_override.cloned().unwrap_or_default();
    let name = image_override.name.unwrap_or_else(|| default_name.to_string());
    let tag = image_override.tag.unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string());
    let namespace = image_override
        .namespace
        .unwrap_or_else(|| DEFAULT_BUILDER_IMAGE_NAMESPACE.to_string());
    Ok(ObjectReference::image_stream_tag_in(&name, &tag, &namespace))
}

/// Tag the application image is published under
pub fn application_tag(app: &AppService) -> String {
    app.spec
        .image
        .as_ref()
        .and_then(|image| image.tag.clone())
        .unwrap_or_else(|| DEFAULT_IMAGE_TAG.to_string())
}

/// Fully qualified registry image for the application
pub fn registry_image(app: &AppService, app_name: &str) -> String {
    let image = app.spec.image.clone().unwrap_or_default();
    format!(
        "{}/{}/{}:{}",
        image.domain.as_deref().unwrap_or(DEFAULT_IMAGE_DOMAIN),
        image.namespace.as_deref().unwrap_or(DEFAULT_IMAGE_NAMESPACE),
        image.name.as_deref().unwrap_or(app_name),
        application_tag(app)
    )
}

/// Image the workload runs
///
/// With an image stream the workload pulls `<stream>:<tag>` and lets the
/// stream resolve it; otherwise it pulls the registry image directly.
pub fn deployment_image(
    app: &AppService,
    app_name: &str,
    image_stream: Option<&ImageStream>,
) -> String {
    match image_stream {
        Some(stream) => format!("{}:{}", stream_name(stream, app_name), application_tag(app)),
        None => registry_image(app, app_name),
    }
}

fn stream_name<'a>(stream: &'a ImageStream, fallback: &'a str) -> &'a str {
    stream.metadata.name.as_deref().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app_service;
    use crds::ImageOverride;

    #[test]
    fn test_runtime_build_type_by_runtime_and_native_flag() {
        let mut build = BuildSpec::default();
        assert_eq!(BuildType::runtime_for(&build, RuntimeType::Quarkus), BuildType::RuntimeJvm);
        assert_eq!(BuildType::runtime_for(&build, RuntimeType::SpringBoot), BuildType::Runtime);

        build.native = true;
        assert_eq!(BuildType::runtime_for(&build, RuntimeType::Quarkus), BuildType::Runtime);
        assert_eq!(BuildType::runtime_for(&build, RuntimeType::SpringBoot), BuildType::Runtime);
    }

    #[test]
    fn test_builder_image_table() {
        let reference = builder_image(BuildType::Runtime, RuntimeType::Quarkus, None).unwrap();
        assert_eq!(reference.name, "kogito-quarkus-ubi8:latest");
        assert_eq!(reference.namespace.as_deref(), Some("openshift"));
        assert_eq!(reference.kind, "ImageStreamTag");

        let reference = builder_image(BuildType::RuntimeJvm, RuntimeType::Quarkus, None).unwrap();
        assert_eq!(reference.name, "kogito-quarkus-jvm-ubi8:latest");

        let reference = builder_image(BuildType::Runtime, RuntimeType::SpringBoot, None).unwrap();
        assert_eq!(reference.name, "kogito-springboot-ubi8:latest");

        let reference = builder_image(BuildType::S2i, RuntimeType::SpringBoot, None).unwrap();
        assert_eq!(reference.name, "kogito-springboot-ubi8-s2i:latest");
    }

    #[test]
    fn test_every_selectable_runtime_build_has_an_image() {
        for runtime in [RuntimeType::Quarkus, RuntimeType::SpringBoot] {
            for native in [false, true] {
                let build = BuildSpec {
                    native,
                    ..Default::default()
                };
                let build_type = BuildType::runtime_for(&build, runtime);
                assert!(
                    default_builder_image(build_type, runtime).is_some(),
                    "no image for {runtime:?} native={native}"
                );
            }
        }
    }

    #[test]
    fn test_missing_table_entry_is_invalid() {
        let result = builder_image(BuildType::RuntimeJvm, RuntimeType::SpringBoot, None);
        assert!(matches!(result, Err(ComposeError::InvalidSpec(_))));
    }

    #[test]
    fn test_builder_image_override_fields() {
        let image_override = BuilderImageOverride {
            name: None,
            tag: Some("1.2".to_string()),
            namespace: Some("images".to_string()),
        };
        let reference =
            builder_image(BuildType::S2i, RuntimeType::Quarkus, Some(&image_override)).unwrap();
        assert_eq!(reference.name, "kogito-quarkus-ubi8-s2i:1.2");
        assert_eq!(reference.namespace.as_deref(), Some("images"));
    }

    #[test]
    fn test_registry_image_defaults_and_override() {
        let mut app = create_test_app_service("svc-a", "ns1");
        assert_eq!(registry_image(&app, "svc-a"), "quay.io/microscaler/svc-a:latest");

        app.spec.image = Some(ImageOverride {
            domain: Some("registry.local".to_string()),
            namespace: None,
            name: Some("custom".to_string()),
            tag: Some("0.9".to_string()),
        });
        assert_eq!(registry_image(&app, "svc-a"), "registry.local/microscaler/custom:0.9");
        assert_eq!(deployment_image(&app, "svc-a", None), "registry.local/microscaler/custom:0.9");
    }
}
