//! Runtime build builder
//!
//! Copies the compiled application out of the source build's output image
//! into a minimal runtime image, and rebuilds whenever that output changes.

use super::build_config_s2i::SOURCE_STRATEGY;
use super::error::ComposeError;
use super::images::{self, BuildType, LABEL_BUILD_TYPE};
use super::meta;
use crds::{
    AppService, BuildConfig, BuildConfigSpec, BuildOutput, BuildSource, BuildSourceType,
    BuildStrategy, BuildTriggerPolicy, BuildTriggerType, ImageChangeTrigger, ImageSource,
    ImageSourcePath, ObjectReference, SourceBuildStrategy, DEFAULT_IMAGE_TAG,
};

/// Where the builder image leaves the compiled application
pub const RUNNER_SOURCE_PATH: &str = "/home/kogito/bin";

/// Where the runtime build copies it to
pub const DESTINATION_DIR: &str = ".";

/// Builds the runtime BuildConfig chained to `source_build`
pub fn new_build_config_runtime(
    app: &AppService,
    source_build: Option<&BuildConfig>,
) -> Result<BuildConfig, ComposeError> {
    let source_build = source_build.ok_or_else(|| {
        ComposeError::MissingUpstreamBuild(
            "a runtime build requires the source build definition".to_string(),
        )
    })?;
    let upstream_output = source_build.spec.output.to.clone().ok_or_else(|| {
        ComposeError::MissingUpstreamBuild(format!(
            "source build {} declares no output image",
            source_build.metadata.name.as_deref().unwrap_or("<unnamed>")
        ))
    })?;

    let (name, _) = meta::identity(app)?;
    let build_type = BuildType::runtime_for(&app.spec.build, app.spec.runtime);
    let image_override = app.spec.build.image_runtime.as_ref();
    let base_image = images::builder_image(build_type, app.spec.runtime, image_override)?;

    let mut build_config = BuildConfig::new(
        name,
        BuildConfigSpec {
            source: BuildSource {
                source_type: BuildSourceType::Image,
                git: None,
                context_dir: None,
                images: vec![ImageSource {
                    from: upstream_output.clone(),
                    paths: vec![ImageSourcePath {
                        source_path: RUNNER_SOURCE_PATH.to_string(),
                        destination_dir: DESTINATION_DIR.to_string(),
                    }],
                }],
            },
            strategy: BuildStrategy {
                strategy_type: SOURCE_STRATEGY.to_string(),
                source_strategy: Some(SourceBuildStrategy {
                    from: base_image,
                    env: Vec::new(),
                }),
            },
            output: BuildOutput {
                to: Some(ObjectReference::image_stream_tag(name, DEFAULT_IMAGE_TAG)),
            },
            // Any change to the source build output starts a runtime build
            triggers: vec![BuildTriggerPolicy {
                trigger_type: BuildTriggerType::ImageChange,
                image_change: Some(ImageChangeTrigger {
                    from: Some(upstream_output),
                }),
            }],
        },
    );
    build_config.metadata = meta::object_meta(app, name)?;
    build_config
        .metadata
        .labels
        .get_or_insert_with(Default::default)
        .insert(LABEL_BUILD_TYPE.to_string(), build_type.as_str().to_string());
    Ok(build_config)
}
