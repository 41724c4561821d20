//! Reconciliation logic for AppService CRDs.
//!
//! Captures a platform snapshot, composes the desired objects, applies them
//! and records the outcome in the AppService status.

use crate::apply::Applier;
use crate::error::ControllerError;
use crate::resources::compose;
use chrono::{DateTime, Utc};
use crds::{AppService, AppServiceStatus, ProvisioningState};
use kube::{Api, Client};
use kube::api::{Patch, PatchParams};
use platform_client::{KubePlatformClient, LookupError};
use serde_json::json;
use tracing::{debug, error, info};

/// Reconciles AppService resources.
pub struct Reconciler {
    platform: KubePlatformClient,
    applier: Applier,
    client: Client,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("platform", &self.platform)
            .field("applier", &self.applier)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Creates a new reconciler instance.
    pub fn new(platform: KubePlatformClient, applier: Applier, client: Client) -> Self {
        Self {
            platform,
            applier,
            client,
        }
    }

    /// Reconciles an AppService resource.
    ///
    /// The status is patched only when the outcome differs from what it
    /// already records.
    pub async fn reconcile_app_service(&self, app: &AppService) -> Result<(), ControllerError> {
        let (name, namespace) = app_identity(app)?;
        info!("Reconciling AppService {}/{}", namespace, name);

        let outcome = self.provision(app).await;
        if let Err(e) = &outcome {
            error!("Failed to provision AppService {}/{}: {}", namespace, name, e);
        }

        if let Some(status) = next_status(app.status.as_ref(), &outcome, Utc::now()) {
            self.patch_status(name, namespace, &status).await?;
            info!("Updated AppService {}/{} status to {}", namespace, name, status.state.as_str());
        }

        outcome.map(|_| ())
    }

    async fn provision(&self, app: &AppService) -> Result<u32, ControllerError> {
        let snapshot = self.platform.snapshot(app).await?;
        let resources = compose(app, &snapshot).into_result()?;
        if resources.is_empty() {
            debug!(
                "Nothing to apply for AppService {}",
                app.metadata.name.as_deref().unwrap_or_default()
            );
        }
        let applied = self.applier.apply_bundle(&resources).await?;
        info!(
            "Applied {} objects for AppService {}/{}",
            applied,
            app.metadata.namespace.as_deref().unwrap_or_default(),
            app.metadata.name.as_deref().unwrap_or_default()
        );
        Ok(applied)
    }

    async fn patch_status(
        &self,
        name: &str,
        namespace: &str,
        status: &AppServiceStatus,
    ) -> Result<(), ControllerError> {
        let api: Api<AppService> = Api::namespaced(self.client.clone(), namespace);
        let status_patch = json!({ "status": status });
        api.patch_status(name, &PatchParams::default(), &Patch::Merge(&status_patch))
            .await?;
        Ok(())
    }
}

/// Name and namespace of `app`, as a lookup failure when either is missing
pub fn app_identity(app: &AppService) -> Result<(&str, &str), ControllerError> {
    app.identity().map_err(|e| ControllerError::Lookup(e.into()))
}

/// Status to record for `outcome`, or `None` when `current` already matches
///
/// `last_reconciled` only moves when the state changes.
pub fn next_status(
    current: Option<&AppServiceStatus>,
    outcome: &Result<u32, ControllerError>,
    now: DateTime<Utc>,
) -> Option<AppServiceStatus> {
    let previous = current.cloned().unwrap_or_default();
    let (state, error, resources) = match outcome {
        Ok(applied) => (ProvisioningState::Provisioned, None, *applied),
        Err(e) => (ProvisioningState::Failed, Some(e.to_string()), previous.resources),
    };

    let last_reconciled = if current.is_none() || previous.state != state {
        Some(now)
    } else {
        previous.last_reconciled
    };

    let status = AppServiceStatus {
        state,
        error,
        resources,
        last_reconciled,
    };
    (current != Some(&status)).then_some(status)
}

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod tests;
