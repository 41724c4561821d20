//! AppService Controller
//!
//! Composes the desired objects of every `AppService` (image stream, builds,
//! Deployment, Service, Route and Kafka topics), applies them with
//! server-side apply and records the outcome in the AppService status.

mod apply;
mod config;
mod controller;
mod error;
mod reconciler;
mod resources;
#[cfg(test)]
mod test_utils;
mod watcher;

use crate::config::Config;
use crate::error::ControllerError;
use controller::Controller;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting AppService Controller");

    let config = Config::from_env()?;

    info!("Configuration:");
    info!("  Namespace: {}", config.namespace.as_deref().unwrap_or("all namespaces"));
    info!("  Field manager: {}", config.field_manager);

    let controller = Controller::new(config).await?;
    controller.run().await?;

    Ok(())
}
