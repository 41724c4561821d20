//! Source build builder
//!
//! Compiles the application from source (git) or from uploaded content
//! (binary) with the S2I builder image of its runtime.

use super::error::ComposeError;
use super::images::{self, BuildType, LABEL_BUILD_TYPE};
use super::meta;
use crds::{
    AppService, BuildConfig, BuildConfigSpec, BuildEnvVar, BuildOutput, BuildSource,
    BuildSourceType, BuildStrategy, BuildTriggerPolicy, BuildTriggerType, GitBuildSource,
    ObjectReference, SourceBuildStrategy, DEFAULT_IMAGE_TAG,
};

/// Suffix of the source build and of the stream receiving its output
pub const BUILDER_SUFFIX: &str = "-builder";

/// Strategy type of source-to-image builds
pub const SOURCE_STRATEGY: &str = "Source";

/// Build env var telling the builder image to produce a native executable
const NATIVE_ENV: &str = "NATIVE";

/// Name of the source build for an application
pub fn builder_name(app_name: &str) -> String {
    format!("{app_name}{BUILDER_SUFFIX}")
}

/// Builds the source BuildConfig
pub fn new_build_config_s2i(app: &AppService) -> Result<BuildConfig, ComposeError> {
    let (app_name, _) = meta::identity(app)?;
    let name = builder_name(app_name);
    let build = &app.spec.build;

    let builder_image =
        images::builder_image(BuildType::S2i, app.spec.runtime, build.image_s2i.as_ref())?;

    let (source, triggers) = match &build.git_source {
        Some(git) => (
            BuildSource {
                source_type: BuildSourceType::Git,
                git: Some(GitBuildSource {
                    uri: git.uri.clone(),
                    reference: git.reference.clone(),
                }),
                context_dir: git.context_dir.clone(),
                images: Vec::new(),
            },
            vec![BuildTriggerPolicy {
                trigger_type: BuildTriggerType::ConfigChange,
                image_change: None,
            }],
        ),
        // Binary builds are started by the client uploading content
        None => (BuildSource::default(), Vec::new()),
    };

    let mut env = vec![BuildEnvVar {
        name: NATIVE_ENV.to_string(),
        value: build.native.to_string(),
    }];
    env.extend(build.env.iter().map(|entry| BuildEnvVar {
        name: entry.name.clone(),
        value: entry.value.clone(),
    }));

    let mut build_config = BuildConfig::new(
        &name,
        BuildConfigSpec {
            source,
            strategy: BuildStrategy {
                strategy_type: SOURCE_STRATEGY.to_string(),
                source_strategy: Some(SourceBuildStrategy { from: builder_image, env }),
            },
            output: BuildOutput {
                to: Some(ObjectReference::image_stream_tag(&name, DEFAULT_IMAGE_TAG)),
            },
            triggers,
        },
    );
    build_config.metadata = meta::object_meta(app, &name)?;
    build_config
        .metadata
        .labels
        .get_or_insert_with(Default::default)
        .insert(LABEL_BUILD_TYPE.to_string(), BuildType::S2i.as_str().to_string());
    Ok(build_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_app_service;
    use crds::{EnvEntry, GitSource, RuntimeType};

    #[test]
    fn test_binary_build_by_default() {
        let app = create_test_app_service("svc-a", "ns1");
        let build_config = new_build_config_s2i(&app).unwrap();

        assert_eq!(build_config.metadata.name.as_deref(), Some("svc-a-builder"));
        assert_eq!(build_config.spec.source.source_type, BuildSourceType::Binary);
        assert!(build_config.spec.source.git.is_none());
        assert!(build_config.spec.triggers.is_empty());
        assert_eq!(
            build_config.spec.output.to,
            Some(ObjectReference::image_stream_tag("svc-a-builder", "latest"))
        );
        let labels = build_config.metadata.labels.unwrap();
        assert_eq!(labels.get(LABEL_BUILD_TYPE).map(String::as_str), Some("S2I"));
    }

    #[test]
    fn test_git_build_uses_runtime_builder_image() {
        let mut app = create_test_app_service("svc-a", "ns1");
        app.spec.runtime = RuntimeType::SpringBoot;
        app.spec.build.git_source = Some(GitSource {
            uri: "https://github.com/example/svc-a".to_string(),
            reference: Some("main".to_string()),
            context_dir: Some("app".to_string()),
        });
        app.spec.build.env = vec![EnvEntry {
            name: "MAVEN_ARGS".to_string(),
            value: "-DskipTests".to_string(),
        }];

        let build_config = new_build_config_s2i(&app).unwrap();
        let source = &build_config.spec.source;
        assert_eq!(source.source_type, BuildSourceType::Git);
        assert_eq!(source.git.as_ref().unwrap().reference.as_deref(), Some("main"));
        assert_eq!(source.context_dir.as_deref(), Some("app"));
        assert_eq!(build_config.spec.triggers[0].trigger_type, BuildTriggerType::ConfigChange);

        let strategy = build_config.spec.strategy.source_strategy.unwrap();
        assert_eq!(strategy.from.name, "kogito-springboot-ubi8-s2i:latest");
        assert_eq!(
            strategy.env[0],
            BuildEnvVar { name: "NATIVE".to_string(), value: "false".to_string() }
        );
        assert_eq!(strategy.env[1].name, "MAVEN_ARGS");
    }

    #[test]
    fn test_git_source_serializes_ref() {
        let mut app = create_test_app_service("svc-a", "ns1");
        app.spec.build.git_source = Some(GitSource {
            uri: "https://github.com/example/svc-a".to_string(),
            reference: Some("v1".to_string()),
            context_dir: None,
        });
        let json = serde_json::to_value(new_build_config_s2i(&app).unwrap()).unwrap();

        assert_eq!(json["apiVersion"], "build.openshift.io/v1");
        assert_eq!(json["spec"]["source"]["type"], "Git");
        assert_eq!(json["spec"]["source"]["git"]["ref"], "v1");
        assert_eq!(json["spec"]["strategy"]["type"], "Source");
        assert_eq!(json["spec"]["strategy"]["sourceStrategy"]["from"]["kind"], "ImageStreamTag");
    }
}
