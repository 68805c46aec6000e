//! Final assembly of a wizard session into a persistable submission, and the
//! intake service that carries it to the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{ApplicantData, DocumentSlot, ProjectData, WizardStep};
use super::machine::WizardStateMachine;
use crate::programs::{FundingRange, ProcessingTime};
use crate::store::{
    ApplicationDocumentRecord, ApplicationStatus, ApplicationStore, FundingApplicationRecord,
    Notification, NotificationKind, NotificationPriority, NotificationSink, StoreError,
};

/// One uploaded file attached to a submission, keyed by its document slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub document_type: String,
    pub file_name: String,
}

/// Self-contained snapshot of a finished wizard session. Serialized to a JSON
/// string and stored verbatim as the application payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub program_id: String,
    pub program_name: String,
    pub funding_range: FundingRange,
    pub processing_time: ProcessingTime,
    pub applicant: ApplicantData,
    pub project: ProjectData,
    pub documents: Vec<DocumentRef>,
    pub submission_date: DateTime<Utc>,
}

/// Human-facing reference handed back on success, `FA-<PROGRAM>-<millis>`.
pub fn reference_number(program_id: &str, at: DateTime<Utc>) -> String {
    format!("FA-{}-{}", program_id.to_uppercase(), at.timestamp_millis())
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("no funding program selected")]
    MissingProgram,
    #[error("terms and conditions must be accepted before submitting")]
    TermsNotAccepted,
    #[error("submission has validation errors")]
    Validation(Vec<String>),
    #[error("applicant email is missing from the submission")]
    MissingEmail,
    #[error("failed to serialize submission payload: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Builds a [`Submission`] from a wizard session without touching storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionAssembler;

impl SubmissionAssembler {
    /// Snapshot the wizard data. Requires a selected program; the terms gate
    /// and server-side revalidation live in [`IntakeService::submit`].
    pub fn assemble(&self, machine: &WizardStateMachine) -> Result<Submission, SubmissionError> {
        self.assemble_at(machine, Utc::now())
    }

    pub fn assemble_at(
        &self,
        machine: &WizardStateMachine,
        at: DateTime<Utc>,
    ) -> Result<Submission, SubmissionError> {
        let config = machine.config().ok_or(SubmissionError::MissingProgram)?;
        let data = machine.data();

        let mut documents = Vec::new();
        for slot in DocumentSlot::ALL {
            for file_name in data.documents.files(slot) {
                documents.push(DocumentRef {
                    document_type: slot.config_key().to_string(),
                    file_name: file_name.clone(),
                });
            }
        }

        Ok(Submission {
            program_id: config.program_id.clone(),
            program_name: config.program_name.clone(),
            funding_range: config.funding_range.clone(),
            processing_time: config.processing_time.clone(),
            applicant: data.applicant.clone(),
            project: data.project.clone(),
            documents,
            submission_date: at,
        })
    }
}

/// What the caller gets back after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub application_id: String,
    pub reference_number: String,
    pub program_name: String,
    pub processing_time: String,
}

/// Intake orchestration over pluggable storage and notification backends.
pub struct IntakeService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    assembler: SubmissionAssembler,
}

impl<S, N> IntakeService<S, N>
where
    S: ApplicationStore,
    N: NotificationSink,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            store,
            notifier,
            assembler: SubmissionAssembler,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Submit a finished wizard session.
    ///
    /// Order matters: the terms gate and a full server-side revalidation of
    /// the applicant and project steps run before anything is persisted, and
    /// the wizard is reset only after the store accepted the record. A failed
    /// create leaves the session intact so the caller can retry.
    pub fn submit(
        &self,
        machine: &mut WizardStateMachine,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let config = machine.config().ok_or(SubmissionError::MissingProgram)?;
        if !machine.data().terms_accepted {
            return Err(SubmissionError::TermsNotAccepted);
        }

        let mut errors = Vec::new();
        for step in [WizardStep::Applicant, WizardStep::Project] {
            errors.extend(machine.validate_step(step).errors);
        }
        if !errors.is_empty() {
            return Err(SubmissionError::Validation(errors));
        }

        let submission = self.assembler.assemble(machine)?;
        let applicant_email = submission.applicant.email.trim().to_string();
        if applicant_email.is_empty() {
            return Err(SubmissionError::MissingEmail);
        }

        let reference = reference_number(&config.program_id, submission.submission_date);
        let payload = serde_json::to_string(&submission)?;

        let record = self.store.create(FundingApplicationRecord {
            id: String::new(),
            program_id: submission.program_id.clone(),
            program_name: submission.program_name.clone(),
            payload,
            status: ApplicationStatus::Submitted,
            applicant_email,
            submitted_at: submission.submission_date,
        })?;

        let document_rows: Vec<ApplicationDocumentRecord> = submission
            .documents
            .iter()
            .map(|doc| ApplicationDocumentRecord {
                application_id: record.id.clone(),
                document_type: doc.document_type.clone(),
                file_name: doc.file_name.clone(),
                uploaded_at: submission.submission_date,
            })
            .collect();
        self.store.create_documents(document_rows)?;

        // Fire-and-forget: a dead notification channel never fails a submit.
        let notification = Notification {
            kind: NotificationKind::Success,
            priority: NotificationPriority::Medium,
            title: "Funding Application Submitted".to_string(),
            message: format!(
                "Application {} for {} received",
                reference, submission.program_name
            ),
            related_entity: Some("FundingApplications".to_string()),
            related_entity_id: Some(record.id.clone()),
        };
        if let Err(error) = self.notifier.notify(notification) {
            warn!(%error, application_id = %record.id, "submission notification failed");
        }

        info!(
            application_id = %record.id,
            reference = %reference,
            program = %submission.program_id,
            "funding application submitted"
        );

        let receipt = SubmissionReceipt {
            application_id: record.id,
            reference_number: reference,
            program_name: submission.program_name,
            processing_time: submission.processing_time.display(),
        };
        machine.discard_progress();
        Ok(receipt)
    }

    pub fn get(&self, id: &str) -> Result<Option<FundingApplicationRecord>, StoreError> {
        self.store.fetch(id)
    }

    pub fn get_documents(&self, id: &str) -> Result<Vec<ApplicationDocumentRecord>, StoreError> {
        self.store.fetch_documents(id)
    }

    pub fn list(&self) -> Result<Vec<FundingApplicationRecord>, StoreError> {
        self.store.list()
    }

    /// Move an application to a new review status. Approvals and rejections
    /// raise a notification; the transition itself never depends on it.
    pub fn update_status(&self, id: &str, status: ApplicationStatus) -> Result<(), StoreError> {
        self.store.update_status(id, status)?;

        let (kind, title) = match status {
            ApplicationStatus::Approved => {
                (NotificationKind::Success, "Funding Application Approved")
            }
            ApplicationStatus::Rejected => {
                (NotificationKind::Warning, "Funding Application Rejected")
            }
            _ => return Ok(()),
        };
        let notification = Notification {
            kind,
            priority: NotificationPriority::High,
            title: title.to_string(),
            message: format!("Application {id} is now {}", status.label()),
            related_entity: Some("FundingApplications".to_string()),
            related_entity_id: Some(id.to_string()),
        };
        if let Err(error) = self.notifier.notify(notification) {
            warn!(%error, application_id = %id, "status notification failed");
        }
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id)
    }
}
