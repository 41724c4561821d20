//! AppOps CRD Definitions
//!
//! The `AppService` custom resource plus typed views of the OpenShift and
//! Strimzi kinds the AppOps controller reads or renders.

pub mod app_service;
pub mod openshift;
pub mod references;
pub mod strimzi;

pub use app_service::*;
pub use openshift::*;
pub use references::*;
pub use strimzi::*;
