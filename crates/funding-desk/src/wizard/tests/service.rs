use std::sync::Arc;

use super::common::*;
use crate::store::{ApplicationStatus, ApplicationStore, MemoryStore, NotificationKind};
use crate::wizard::{IntakeService, SubmissionError, WizardStateMachine, WizardStep};

#[test]
fn submit_persists_record_documents_and_notification() {
    let (service, store) = build_service();
    let mut machine = completed_machine();

    let receipt = service.submit(&mut machine).expect("valid submission");
    assert!(
        receipt.reference_number.starts_with("FA-STARTUP-"),
        "reference: {}",
        receipt.reference_number
    );
    assert_eq!(receipt.program_name, "Startup Launch Fund");
    assert_eq!(receipt.processing_time, "4 weeks");

    let records = store.list().expect("list applications");
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, receipt.application_id);
    assert_eq!(record.status, ApplicationStatus::Submitted);
    assert_eq!(record.applicant_email, "alice@example.com");

    let payload: serde_json::Value =
        serde_json::from_str(&record.payload).expect("payload is json");
    assert_eq!(payload["applicant"]["fullName"], "Alice Uwase");
    assert_eq!(payload["project"]["fundingAmount"], "10000000");

    let documents = store.fetch_documents(&record.id).expect("documents");
    assert_eq!(documents.len(), 2);

    let notifications = store.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert!(notifications[0]
        .message
        .contains(&receipt.reference_number));
}

#[test]
fn submit_resets_the_wizard_only_on_success() {
    let (service, _) = build_service();
    let mut machine = completed_machine();
    service.submit(&mut machine).expect("valid submission");

    assert_eq!(machine.current_step(), WizardStep::Program);
    assert_eq!(machine.data(), &Default::default());
    assert!(machine.config().is_none());
}

#[test]
fn submit_requires_accepted_terms() {
    let (service, store) = build_service();
    let mut machine = completed_machine();
    machine.set_terms(false);

    let error = service.submit(&mut machine).unwrap_err();
    assert!(matches!(error, SubmissionError::TermsNotAccepted));
    assert!(store.list().unwrap().is_empty());
    // The session survives a rejected submit.
    assert_eq!(machine.data().applicant.full_name, "Alice Uwase");
}

#[test]
fn submit_revalidates_steps_server_side() {
    let (service, store) = build_service();
    let mut machine = completed_machine();
    machine.set_applicant_field("email", "not-an-email");

    match service.submit(&mut machine) {
        Err(SubmissionError::Validation(errors)) => {
            assert!(errors.iter().any(|error| error.contains("Email")));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn submit_without_a_program_is_rejected() {
    let (service, _) = build_service();
    let mut machine = WizardStateMachine::new();
    machine.set_terms(true);

    let error = service.submit(&mut machine).unwrap_err();
    assert!(matches!(error, SubmissionError::MissingProgram));
}

#[test]
fn missing_email_is_caught_even_when_the_config_does_not_require_it() {
    let (service, _) = build_service();
    let programs = optional_email_catalog();
    let mut machine = WizardStateMachine::new();
    machine
        .select_program(&programs, "startup")
        .expect("modified startup exists");
    fill_applicant(&mut machine);
    machine.set_applicant_field("email", "");
    fill_project(&mut machine);
    machine.set_terms(true);

    let error = service.submit(&mut machine).unwrap_err();
    assert!(matches!(error, SubmissionError::MissingEmail));
}

#[test]
fn failed_store_write_preserves_the_session() {
    let service = IntakeService::new(Arc::new(UnavailableStore), Arc::new(FailingSink));
    let mut machine = completed_machine();

    let error = service.submit(&mut machine).unwrap_err();
    assert!(matches!(error, SubmissionError::Store(_)));

    // Nothing was discarded; the caller can retry against a healthy store.
    assert_eq!(machine.data().applicant.full_name, "Alice Uwase");
    assert_eq!(machine.data().project.title, "Cold-chain logistics");
    assert!(machine.data().terms_accepted);
    assert_eq!(machine.config().map(|c| c.program_id.as_str()), Some("startup"));
}

#[test]
fn a_dead_notification_channel_never_fails_a_submit() {
    let store = Arc::new(MemoryStore::new());
    let service = IntakeService::new(store.clone(), Arc::new(FailingSink));
    let mut machine = completed_machine();

    let receipt = service.submit(&mut machine).expect("submit still succeeds");
    assert_eq!(store.list().unwrap()[0].id, receipt.application_id);
}

#[test]
fn status_updates_flow_through_to_the_store() {
    let (service, store) = build_service();
    let mut machine = completed_machine();
    let receipt = service.submit(&mut machine).expect("valid submission");

    service
        .update_status(&receipt.application_id, ApplicationStatus::UnderReview)
        .expect("known application");
    assert_eq!(
        store.fetch(&receipt.application_id).unwrap().unwrap().status,
        ApplicationStatus::UnderReview
    );

    service.delete(&receipt.application_id).expect("delete");
    assert!(service.get(&receipt.application_id).unwrap().is_none());
}

#[test]
fn approvals_and_rejections_raise_a_notification() {
    let (service, store) = build_service();
    let mut machine = completed_machine();
    let receipt = service.submit(&mut machine).expect("valid submission");
    let submitted = store.notifications().len();

    service
        .update_status(&receipt.application_id, ApplicationStatus::UnderReview)
        .expect("known application");
    assert_eq!(store.notifications().len(), submitted);

    service
        .update_status(&receipt.application_id, ApplicationStatus::Approved)
        .expect("known application");
    let notifications = store.notifications();
    assert_eq!(notifications.len(), submitted + 1);
    let latest = notifications.last().unwrap();
    assert_eq!(latest.kind, NotificationKind::Success);
    assert_eq!(
        latest.related_entity_id.as_deref(),
        Some(receipt.application_id.as_str())
    );
}
