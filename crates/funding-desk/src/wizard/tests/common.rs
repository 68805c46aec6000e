use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::programs::{FieldRule, ProgramCatalog, ProgramConfigLoader};
use crate::store::{
    ApplicationDocumentRecord, ApplicationStatus, ApplicationStore, FundingApplicationRecord,
    MemoryStore, Notification, NotificationSink, NotifyError, StoreError,
};
use crate::wizard::router::{intake_router, IntakeState};
use crate::wizard::{DocumentSlot, IntakeService, WizardStateMachine};

pub(super) fn catalog() -> ProgramCatalog {
    ProgramCatalog::builtin()
}

/// Fresh machine with the startup program already selected.
pub(super) fn startup_machine() -> WizardStateMachine {
    let mut machine = WizardStateMachine::new();
    machine
        .select_program(&catalog(), "startup")
        .expect("startup program exists");
    machine
}

pub(super) fn fill_applicant(machine: &mut WizardStateMachine) {
    machine.set_applicant_field("fullName", "Alice Uwase");
    machine.set_applicant_field("email", "alice@example.com");
    machine.set_applicant_field("phone", "+250788123456");
    machine.set_applicant_field("dateOfBirth", "1990-04-12");
    machine.set_applicant_field("city", "Kigali");
    machine.set_applicant_field("country", "Rwanda");
}

pub(super) fn fill_project(machine: &mut WizardStateMachine) {
    machine.set_project_field("title", "Cold-chain logistics");
    machine.set_project_field(
        "description",
        "Last-mile refrigerated delivery for produce cooperatives.",
    );
    machine.set_project_field("fundingAmount", "10000000");
    machine.set_project_field("duration", "12");
    machine.upload_document(DocumentSlot::BusinessPlan, "plan.pdf");
    machine.upload_document(DocumentSlot::FinancialStatements, "fy24.xlsx");
}

/// Machine ready to submit: all steps filled, terms accepted.
pub(super) fn completed_machine() -> WizardStateMachine {
    let mut machine = startup_machine();
    fill_applicant(&mut machine);
    fill_project(&mut machine);
    machine.set_terms(true);
    machine
}

pub(super) fn build_service() -> (IntakeService<MemoryStore, MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = IntakeService::new(store.clone(), store.clone());
    (service, store)
}

pub(super) fn intake_router_with_service(
    service: IntakeService<MemoryStore, MemoryStore>,
) -> axum::Router {
    intake_router(Arc::new(IntakeState {
        service,
        programs: Arc::new(catalog()),
    }))
}

/// Complete intake payload matching `completed_machine`.
pub(super) fn intake_payload() -> Value {
    json!({
        "programId": "startup",
        "applicant": {
            "fullName": "Alice Uwase",
            "email": "alice@example.com",
            "phone": "+250788123456",
            "dateOfBirth": "1990-04-12",
            "city": "Kigali",
            "country": "Rwanda"
        },
        "project": {
            "title": "Cold-chain logistics",
            "description": "Last-mile refrigerated delivery for produce cooperatives.",
            "fundingAmount": "10000000",
            "duration": "12"
        },
        "documents": {
            "businessPlan": ["plan.pdf"],
            "financialStatements": ["fy24.xlsx"]
        },
        "termsAccepted": true
    })
}

/// Catalog whose startup variant treats email as optional, for exercising the
/// submit-time email requirement.
pub(super) fn optional_email_catalog() -> ProgramCatalog {
    let mut config = catalog().load("startup").expect("startup program exists");
    config
        .steps
        .applicant_info
        .fields
        .insert("email".to_string(), FieldRule::optional());
    let mut programs = ProgramCatalog::empty();
    programs.insert(config);
    programs
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Store whose writes always fail, for submit-failure paths.
pub(super) struct UnavailableStore;

impl ApplicationStore for UnavailableStore {
    fn create(
        &self,
        _record: FundingApplicationRecord,
    ) -> Result<FundingApplicationRecord, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn create_documents(
        &self,
        _documents: Vec<ApplicationDocumentRecord>,
    ) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &str) -> Result<Option<FundingApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn fetch_documents(
        &self,
        _application_id: &str,
    ) -> Result<Vec<ApplicationDocumentRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<FundingApplicationRecord>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update_status(&self, _id: &str, _status: ApplicationStatus) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

impl NotificationSink for UnavailableStore {
    fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("channel closed".to_string()))
    }
}

/// Sink that always fails, for checking that notification errors never fail
/// a submit.
pub(super) struct FailingSink;

impl NotificationSink for FailingSink {
    fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("channel closed".to_string()))
    }
}
