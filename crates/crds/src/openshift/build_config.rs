//! BuildConfig (build.openshift.io/v1)
//!
//! Only the subset used by the two-phase source/runtime build.

use crate::references::ObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// API group serving build configs
pub const BUILD_API_GROUP: &str = "build.openshift.io";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "build.openshift.io",
    version = "v1",
    kind = "BuildConfig",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigSpec {
    /// Where the build input comes from
    pub source: BuildSource,

    /// How the build runs
    pub strategy: BuildStrategy,

    /// Where the produced image goes
    pub output: BuildOutput,

    /// Events that start a new build
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggers: Vec<BuildTriggerPolicy>,
}

/// Build input
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildSource {
    /// Source type
    #[serde(rename = "type")]
    pub source_type: BuildSourceType,

    /// Git repository, for `Git` sources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git: Option<GitBuildSource>,

    /// Sub-directory to build from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_dir: Option<String>,

    /// Images to copy content from, for `Image` sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageSource>,
}

/// Build source types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum BuildSourceType {
    /// Content uploaded by the client (`oc start-build --from-dir`)
    #[default]
    Binary,
    /// Git repository
    Git,
    /// Content copied out of other images
    Image,
}

/// Git repository source
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct GitBuildSource {
    /// Repository URI
    pub uri: String,

    /// Branch, tag or commit
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Content copied out of another image
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct ImageSource {
    /// Image to copy from
    pub from: ObjectReference,

    /// Paths to copy
    pub paths: Vec<ImageSourcePath>,
}

/// Source and destination of a copied path
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSourcePath {
    /// Absolute path inside the source image
    pub source_path: String,

    /// Directory relative to the build working directory
    pub destination_dir: String,
}

/// Build strategy; only source-to-image is rendered
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    /// Strategy type ("Source")
    #[serde(rename = "type")]
    pub strategy_type: String,

    /// Source-to-image settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_strategy: Option<SourceBuildStrategy>,
}

/// Source-to-image settings
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct SourceBuildStrategy {
    /// Builder (or base) image
    pub from: ObjectReference,

    /// Build environment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<BuildEnvVar>,
}

/// Name/value pair passed to the build
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct BuildEnvVar {
    /// Variable name
    pub name: String,

    /// Variable value
    pub value: String,
}

/// Build output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct BuildOutput {
    /// Image stream tag receiving the built image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ObjectReference>,
}

/// Event that starts a build
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggerPolicy {
    /// Trigger type
    #[serde(rename = "type")]
    pub trigger_type: BuildTriggerType,

    /// Image watched by an `ImageChange` trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_change: Option<ImageChangeTrigger>,
}

/// Build trigger types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum BuildTriggerType {
    /// Rebuild whenever the watched image changes
    #[default]
    ImageChange,
    /// Rebuild whenever the BuildConfig changes
    ConfigChange,
}

/// Image watched by an `ImageChange` trigger
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct ImageChangeTrigger {
    /// Watched image; the strategy image when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,
}
