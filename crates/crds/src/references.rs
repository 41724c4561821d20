//! Object references used inside foreign resource specs
//!
//! OpenShift builds, image streams and routes point at other objects through a
//! loose `{kind, name, namespace}` triple. This mirrors the core
//! `ObjectReference` but only with the fields those APIs read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Kind used for image stream tag references
pub const KIND_IMAGE_STREAM_TAG: &str = "ImageStreamTag";

/// Kind used for external registry references
pub const KIND_DOCKER_IMAGE: &str = "DockerImage";

/// Kind used for service references
pub const KIND_SERVICE: &str = "Service";

/// Reference to another object by kind and name
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// Kind of the referenced object (e.g. "ImageStreamTag")
    pub kind: String,

    /// Name of the referenced object
    pub name: String,

    /// Namespace of the referenced object (defaults to the referencing object's namespace)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ObjectReference {
    /// Reference to `<stream>:<tag>` in the same namespace
    pub fn image_stream_tag(stream: &str, tag: &str) -> Self {
        Self {
            kind: KIND_IMAGE_STREAM_TAG.to_string(),
            name: format!("{stream}:{tag}"),
            namespace: None,
        }
    }

    /// Reference to `<stream>:<tag>` in another namespace
    pub fn image_stream_tag_in(stream: &str, tag: &str, namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            ..Self::image_stream_tag(stream, tag)
        }
    }

    /// Reference to an image pulled straight from a registry
    pub fn docker_image(image: impl Into<String>) -> Self {
        Self {
            kind: KIND_DOCKER_IMAGE.to_string(),
            name: image.into(),
            namespace: None,
        }
    }
}
