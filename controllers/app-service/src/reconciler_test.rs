//! Unit tests for status computation

use super::*;
use crate::resources::ComposeError;
use chrono::TimeZone;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

#[test]
fn test_first_success_sets_provisioned() {
    let status = next_status(None, &Ok(11), at(100)).unwrap();
    assert_eq!(status.state, ProvisioningState::Provisioned);
    assert_eq!(status.resources, 11);
    assert_eq!(status.error, None);
    assert_eq!(status.last_reconciled, Some(at(100)));
}

#[test]
fn test_unchanged_success_needs_no_patch() {
    let current = AppServiceStatus {
        state: ProvisioningState::Provisioned,
        error: None,
        resources: 11,
        last_reconciled: Some(at(100)),
    };
    assert_eq!(next_status(Some(&current), &Ok(11), at(200)), None);
}

#[test]
fn test_resource_count_change_keeps_timestamp() {
    let current = AppServiceStatus {
        state: ProvisioningState::Provisioned,
        error: None,
        resources: 7,
        last_reconciled: Some(at(100)),
    };
    let status = next_status(Some(&current), &Ok(11), at(200)).unwrap();
    assert_eq!(status.resources, 11);
    assert_eq!(status.last_reconciled, Some(at(100)));
}

#[test]
fn test_failure_records_error_and_transition() {
    let current = AppServiceStatus {
        state: ProvisioningState::Provisioned,
        error: None,
        resources: 11,
        last_reconciled: Some(at(100)),
    };
    let outcome = Err(ControllerError::Compose(ComposeError::InvalidSpec(
        "no base image".to_string(),
    )));
    let status = next_status(Some(&current), &outcome, at(200)).unwrap();

    assert_eq!(status.state, ProvisioningState::Failed);
    assert_eq!(
        status.error.as_deref(),
        Some("Composition failed: Invalid AppService spec: no base image")
    );
    assert_eq!(status.resources, 11);
    assert_eq!(status.last_reconciled, Some(at(200)));
}

#[test]
fn test_recovery_clears_error() {
    let current = AppServiceStatus {
        state: ProvisioningState::Failed,
        error: Some("boom".to_string()),
        resources: 0,
        last_reconciled: Some(at(100)),
    };
    let status = next_status(Some(&current), &Ok(2), at(300)).unwrap();
    assert_eq!(status.state, ProvisioningState::Provisioned);
    assert_eq!(status.error, None);
    assert_eq!(status.last_reconciled, Some(at(300)));
}

#[test]
fn test_missing_metadata_is_a_lookup_error() {
    let mut app = crate::test_utils::create_test_app_service("svc-a", "ns1");
    assert_eq!(app_identity(&app).unwrap(), ("svc-a", "ns1"));

    app.metadata.namespace = None;
    assert!(matches!(
        app_identity(&app),
        Err(ControllerError::Lookup(LookupError::Metadata(
            crds::MetadataError::MissingNamespace(_)
        )))
    ));
}
