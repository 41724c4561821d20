//! Main controller implementation.
//!
//! This module contains the `Controller` struct that wires the platform
//! client, applier and reconciler together and runs the AppService watcher.

use crate::apply::Applier;
use crate::config::Config;
use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::watcher::Watcher;
use crds::AppService;
use kube::{Api, Client};
use platform_client::KubePlatformClient;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main controller for AppService management.
#[derive(Debug)]
pub struct Controller {
    app_service_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance and starts its watcher.
    pub async fn new(config: Config) -> Result<Self, ControllerError> {
        info!("Initializing AppService Controller");

        let kube_client = Client::try_default().await?;

        let app_service_api: Api<AppService> = match config.namespace.as_deref() {
            Some(ns) => Api::namespaced(kube_client.clone(), ns),
            None => Api::all(kube_client.clone()),
        };

        let reconciler = Arc::new(Reconciler::new(
            KubePlatformClient::new(kube_client.clone()),
            Applier::new(kube_client.clone(), config.field_manager),
            kube_client,
        ));
        let watcher = Watcher::new(reconciler, app_service_api);

        let app_service_watcher = tokio::spawn(async move { watcher.watch_app_services().await });

        Ok(Self { app_service_watcher })
    }

    /// Runs the controller until the watcher exits or a shutdown signal arrives.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("AppService Controller running");

        tokio::select! {
            result = &mut self.app_service_watcher => {
                result.map_err(|e| {
                    ControllerError::Watch(format!("AppService watcher panicked: {e}"))
                })??;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|e| {
                    ControllerError::Watch(format!("Failed to listen for shutdown signal: {e}"))
                })?;
                info!("Shutdown signal received");
                self.app_service_watcher.abort();
            }
        }

        Ok(())
    }
}
