//! ImageStream (image.openshift.io/v1)

use crate::references::ObjectReference;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// API group serving image streams
pub const IMAGE_API_GROUP: &str = "image.openshift.io";

/// Annotation carrying image change triggers on workloads
pub const IMAGE_TRIGGERS_ANNOTATION: &str = "image.openshift.io/triggers";

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[kube(
    group = "image.openshift.io",
    version = "v1",
    kind = "ImageStream",
    namespaced,
    derive = "PartialEq"
)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamSpec {
    /// Lets workloads in the namespace resolve `<stream>:<tag>` as an image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookup_policy: Option<ImageLookupPolicy>,

    /// Tracked tags
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagReference>,
}

/// Local name resolution policy
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct ImageLookupPolicy {
    /// Resolve the stream name locally
    pub local: bool,
}

/// One tag of an image stream
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagReference {
    /// Tag name
    pub name: String,

    /// Image the tag imports; unset when builds push to it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ObjectReference>,

    /// Periodic import settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_policy: Option<TagImportPolicy>,

    /// How pulls resolve the tag ("Source" or "Local")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_policy: Option<TagReferencePolicy>,
}

/// Import settings of a tag
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct TagImportPolicy {
    /// Re-import the tag periodically
    #[serde(default)]
    pub scheduled: bool,
}

/// Pull resolution of a tag
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct TagReferencePolicy {
    /// "Source" or "Local"
    #[serde(rename = "type")]
    pub policy_type: String,
}
