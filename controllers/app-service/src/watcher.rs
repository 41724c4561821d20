//! Kubernetes resource watchers.
//!
//! Watches AppService resources and triggers reconciliation on every
//! applied object. Deleted AppServices need no work: their objects carry
//! owner references and are garbage collected.

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crds::AppService;
use futures::TryStreamExt;
use kube::Api;
use kube_runtime::watcher;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Watches AppService resources for changes.
#[derive(Debug)]
pub struct Watcher {
    reconciler: Arc<Reconciler>,
    app_service_api: Api<AppService>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(reconciler: Arc<Reconciler>, app_service_api: Api<AppService>) -> Self {
        Self {
            reconciler,
            app_service_api,
        }
    }

    /// Starts watching AppService resources.
    pub async fn watch_app_services(&self) -> Result<(), ControllerError> {
        info!("Starting AppService watcher");

        let mut stream = Box::pin(watcher(
            self.app_service_api.clone(),
            watcher::Config::default(),
        ));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ControllerError::Watch(format!("Watcher stream error: {e}")))?
        {
            match event {
                watcher::Event::Apply(app) => {
                    debug!("AppService applied: {}", display_name(&app));
                    self.reconcile(&app).await;
                }
                watcher::Event::InitApply(app) => {
                    debug!("AppService init apply: {}", display_name(&app));
                    self.reconcile(&app).await;
                }
                watcher::Event::Delete(app) => {
                    info!("AppService deleted: {}", display_name(&app));
                }
                watcher::Event::Init => {
                    debug!("AppService watcher initialized");
                }
                watcher::Event::InitDone => {
                    info!("AppService watcher initialization complete");
                }
            }
        }

        warn!("AppService watch stream ended");
        Ok(())
    }

    async fn reconcile(&self, app: &AppService) {
        if app.metadata.deletion_timestamp.is_some() {
            debug!("Skipping AppService {} being deleted", display_name(app));
            return;
        }
        if let Err(e) = self.reconciler.reconcile_app_service(app).await {
            error!("Failed to reconcile AppService {}: {}", display_name(app), e);
        }
    }
}

fn display_name(app: &AppService) -> String {
    format!(
        "{}/{}",
        app.metadata.namespace.as_deref().unwrap_or("<unknown>"),
        app.metadata.name.as_deref().unwrap_or("<unknown>")
    )
}
