//! OpenShift resource kinds
//!
//! Typed views of the OpenShift APIs the AppOps controller renders. These are
//! not served by vanilla Kubernetes, so callers probe the API group before
//! emitting them.

pub mod build_config;
pub mod image_stream;
pub mod route;

pub use build_config::*;
pub use image_stream::*;
pub use route::*;
