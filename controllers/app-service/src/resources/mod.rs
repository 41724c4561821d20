//! AppService composition
//!
//! Renders the desired objects of an AppService through a fixed list of
//! steps. Each step fills one slot of [`AppServiceResources`]; steps whose
//! object kind the platform does not serve are skipped. The first failing
//! step latches its error and every later step is skipped.

pub mod build_config_runtime;
pub mod build_config_s2i;
pub mod bundle;
pub mod deployment;
pub mod error;
pub mod image_stream;
pub mod images;
pub mod kafka_topic;
pub mod meta;
pub mod route;
pub mod service;


pub use bundle::{AppServiceResources, Composed};
pub use error::{ComposeError, Dependency, ResourceKind};

use crds::AppService;
use platform_client::{Capability, PlatformLookup};
use tracing::{debug, warn};

/// Mutable state of one composition run
struct PipelineState<'a> {
    app: &'a AppService,
    platform: &'a dyn PlatformLookup,
    namespace: &'a str,
    resources: AppServiceResources,
    error: Option<ComposeError>,
}

/// One entry of the pipeline
struct Step {
    name: &'static str,
    kind: ResourceKind,
    gate: Option<Capability>,
    run: fn(&mut PipelineState<'_>) -> Result<(), ComposeError>,
}

/// Pipeline steps in execution order
///
/// Later steps read the slots of earlier ones, so the order is significant.
const STEPS: &[Step] = &[
    Step {
        name: "image stream",
        kind: ResourceKind::ImageStream,
        gate: Some(Capability::ImageStream),
        run: create_image_stream,
    },
    Step {
        name: "source build",
        kind: ResourceKind::SourceBuild,
        gate: Some(Capability::BuildConfig),
        run: create_source_build,
    },
    Step {
        name: "runtime build",
        kind: ResourceKind::RuntimeBuild,
        gate: Some(Capability::BuildConfig),
        run: create_runtime_build,
    },
    Step {
        name: "deployment",
        kind: ResourceKind::Deployment,
        gate: None,
        run: create_deployment,
    },
    Step {
        name: "service",
        kind: ResourceKind::Service,
        gate: None,
        run: create_service,
    },
    Step {
        name: "route",
        kind: ResourceKind::Route,
        gate: Some(Capability::Route),
        run: create_route,
    },
    Step {
        name: "kafka topics",
        kind: ResourceKind::KafkaTopics,
        gate: None,
        run: create_kafka_topics,
    },
];

/// Compose the desired objects of `app` against `platform`
///
/// Never panics and always returns after the last step. On failure
/// `Composed::error` holds the first error and `resources` what was built
/// before it.
pub fn compose(app: &AppService, platform: &dyn PlatformLookup) -> Composed {
    let (name, namespace) = match meta::identity(app) {
        Ok(identity) => identity,
        Err(error) => {
            warn!("Cannot compose AppService: {}", error);
            return Composed {
                resources: AppServiceResources::default(),
                error: Some(error),
            };
        }
    };

    let mut state = PipelineState {
        app,
        platform,
        namespace,
        resources: AppServiceResources::default(),
        error: None,
    };

    for step in STEPS {
        if state.error.is_some() {
            debug!(step = step.name, "Skipping step after earlier failure");
            continue;
        }
        if let Some(capability) = step.gate {
            if !platform.probe_capability(capability) {
                debug!(step = step.name, %capability, "Skipping step, capability not served");
                continue;
            }
        }
        debug!(step = step.name, kind = %step.kind, "Running step");
        if let Err(error) = (step.run)(&mut state) {
            warn!(step = step.name, "Composition of {}/{} failed: {}", namespace, name, error);
            state.error = Some(error);
        }
    }

    Composed {
        resources: state.resources,
        error: state.error,
    }
}

fn create_image_stream(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    state.resources.image_stream = Some(image_stream::new_image_stream(state.app)?);
    Ok(())
}

fn create_source_build(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let build_config = build_config_s2i::new_build_config_s2i(state.app)?;
    let (app_name, _) = meta::identity(state.app)?;
    let builder_name = build_config_s2i::builder_name(app_name);
    let output_stream = image_stream::new_output_image_stream(state.app, &builder_name)?;
    state.resources.build_config_s2i = Some(build_config);
    state.resources.builder_image_stream = Some(output_stream);
    Ok(())
}

fn create_runtime_build(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let source_build = state.resources.build_config_s2i.as_ref();
    let build_config = build_config_runtime::new_build_config_runtime(state.app, source_build)?;
    state.resources.build_config_runtime = Some(build_config);
    Ok(())
}

fn create_deployment(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let credentials = state
        .platform
        .resolve_credentials(&state.app.spec, state.namespace)
        .map_err(ComposeError::unavailable(Dependency::Credentials))?;
    let endpoint = state
        .platform
        .resolve_broker_endpoint(&state.app.spec.kafka, state.namespace)
        .map_err(ComposeError::unavailable(Dependency::BrokerEndpoint))?;
    let deployment = deployment::new_deployment(
        state.app,
        &credentials,
        endpoint.as_deref(),
        state.resources.image_stream.as_ref(),
    )?;
    state.resources.deployment = Some(deployment);
    Ok(())
}

fn create_service(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let deployment = state.resources.deployment.as_ref().ok_or(ComposeError::InvalidReference {
        kind: ResourceKind::Service,
        dependency: ResourceKind::Deployment,
    })?;
    state.resources.service = Some(service::new_service(deployment));
    Ok(())
}

fn create_route(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let service = state.resources.service.as_ref().ok_or(ComposeError::InvalidReference {
        kind: ResourceKind::Route,
        dependency: ResourceKind::Service,
    })?;
    state.resources.route = Some(route::new_route(service));
    Ok(())
}

fn create_kafka_topics(state: &mut PipelineState<'_>) -> Result<(), ComposeError> {
    let topology = state
        .platform
        .resolve_broker_topology(&state.app.spec.kafka, state.namespace)
        .map_err(ComposeError::unavailable(Dependency::BrokerTopology))?;
    state.resources.kafka_topics = kafka_topic::new_kafka_topics(state.app, &topology)?;
    Ok(())
}
