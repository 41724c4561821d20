//! ImageStream builder
//!
//! Tracks the application image. The stream imports from the override image
//! when one is declared; otherwise its tag is fed by the runtime build.

use super::error::ComposeError;
use super::images;
use super::meta;
use crds::{
    AppService, ImageLookupPolicy, ImageStream, ImageStreamSpec, ObjectReference, TagImportPolicy,
    TagReference, TagReferencePolicy,
};

/// Reference policy resolving pulls through the internal registry
const REFERENCE_POLICY_LOCAL: &str = "Local";

/// Builds the application ImageStream from the AppService alone
pub fn new_image_stream(app: &AppService) -> Result<ImageStream, ComposeError> {
    let (name, _) = meta::identity(app)?;
    let from = app
        .spec
        .image
        .as_ref()
        .map(|_| ObjectReference::docker_image(images::registry_image(app, name)));
    let import_policy = from.as_ref().map(|_| TagImportPolicy { scheduled: true });

    let mut image_stream = ImageStream::new(
        name,
        ImageStreamSpec {
            lookup_policy: Some(ImageLookupPolicy { local: true }),
            tags: vec![TagReference {
                name: images::application_tag(app),
                from,
                import_policy,
                reference_policy: Some(TagReferencePolicy {
                    policy_type: REFERENCE_POLICY_LOCAL.to_string(),
                }),
            }],
        },
    );
    image_stream.metadata = meta::object_meta(app, name)?;
    Ok(image_stream)
}

/// Builds an ImageStream that only receives build output
pub fn new_output_image_stream(
    app: &AppService,
    stream_name: &str,
) -> Result<ImageStream, ComposeError> {
    let mut image_stream = ImageStream::new(
        stream_name,
        ImageStreamSpec {
            lookup_policy: Some(ImageLookupPolicy { local: true }),
            tags: Vec::new(),
        },
    );
    image_stream.metadata = meta::object_meta(app, stream_name)?;
    Ok(image_stream)
}
