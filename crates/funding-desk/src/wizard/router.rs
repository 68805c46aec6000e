//! HTTP surface for funding application intake and review.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicantData, DocumentSlot, DocumentUploads, ProjectData, APPLICANT_FIELDS, PROJECT_FIELDS,
};
use super::machine::WizardStateMachine;
use super::submission::{IntakeService, SubmissionError};
use crate::error::AppError;
use crate::export;
use crate::listing::applications::{ApplicationFilter, ApplicationRow, ApplicationSort};
use crate::listing::ListQueryState;
use crate::programs::{ProgramConfigLoader, ProgramError};
use crate::store::{ApplicationStatus, ApplicationStore, NotificationSink, StoreError};

/// Shared handler state: the intake service plus the program catalog used to
/// resolve the submitted program key.
pub struct IntakeState<S, N> {
    pub service: IntakeService<S, N>,
    pub programs: Arc<dyn ProgramConfigLoader>,
}

/// Router builder exposing intake, review, and export endpoints.
pub fn intake_router<S, N>(state: Arc<IntakeState<S, N>>) -> Router
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    Router::new()
        .route(
            "/api/v1/bank/applications",
            post(submit_handler::<S, N>).get(list_handler::<S, N>),
        )
        .route(
            "/api/v1/bank/applications/export",
            get(export_handler::<S, N>),
        )
        .route(
            "/api/v1/bank/applications/:application_id",
            get(detail_handler::<S, N>).delete(delete_handler::<S, N>),
        )
        .route(
            "/api/v1/bank/applications/:application_id/status",
            patch(status_handler::<S, N>),
        )
        .with_state(state)
}

/// A complete intake payload: one wizard session worth of data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    pub program_id: String,
    #[serde(default)]
    pub applicant: ApplicantData,
    #[serde(default)]
    pub project: ProjectData,
    #[serde(default)]
    pub documents: DocumentUploads,
    #[serde(default)]
    pub terms_accepted: bool,
}

impl IntakeRequest {
    /// Replay the payload through a fresh wizard session so the server-side
    /// checks match what an interactive client would have seen.
    fn into_machine(
        self,
        programs: &dyn ProgramConfigLoader,
    ) -> Result<WizardStateMachine, ProgramError> {
        let mut machine = WizardStateMachine::new();
        machine.select_program(programs, &self.program_id)?;
        for name in APPLICANT_FIELDS {
            if let Some(value) = self.applicant.field(name) {
                machine.set_applicant_field(name, value);
            }
        }
        for name in PROJECT_FIELDS {
            if let Some(value) = self.project.field(name) {
                machine.set_project_field(name, value);
            }
        }
        for slot in DocumentSlot::ALL {
            for file_name in self.documents.files(slot) {
                machine.upload_document(slot, file_name.clone());
            }
        }
        machine.set_terms(self.terms_accepted);
        Ok(machine)
    }
}

async fn submit_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    axum::Json(request): axum::Json<IntakeRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    let mut machine = match request.into_machine(state.programs.as_ref()) {
        Ok(machine) => machine,
        Err(error @ ProgramError::NotFound { .. }) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        Err(error) => return AppError::from(error).into_response(),
    };

    match state.service.submit(&mut machine) {
        Ok(receipt) => (StatusCode::CREATED, axum::Json(receipt)).into_response(),
        Err(SubmissionError::Validation(errors)) => {
            let payload = json!({
                "error": "submission has validation errors",
                "details": errors,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(
            error @ (SubmissionError::MissingProgram
            | SubmissionError::TermsNotAccepted
            | SubmissionError::MissingEmail),
        ) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(SubmissionError::Store(error)) => AppError::from(error).into_response(),
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

/// Query-string form of the list filters; multi-valued categories take
/// comma-separated values.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub program: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
}

fn parse_date(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)?
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)?
    };
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

fn parse_sort(value: &str) -> Option<ApplicationSort> {
    match value {
        "newest" => Some(ApplicationSort::NewestFirst),
        "oldest" => Some(ApplicationSort::OldestFirst),
        "applicant" => Some(ApplicationSort::ApplicantName),
        "program" => Some(ApplicationSort::ProgramName),
        "amount" => Some(ApplicationSort::AmountHighToLow),
        "status" => Some(ApplicationSort::Status),
        _ => None,
    }
}

fn query_state(
    params: &ListParams,
) -> Result<ListQueryState<ApplicationFilter, ApplicationSort>, String> {
    let mut state = ListQueryState::new();
    if let Some(search) = &params.search {
        state.set_search(search.clone());
    }

    let mut filters = Vec::new();
    if let Some(statuses) = &params.status {
        for value in statuses.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            let status = ApplicationStatus::parse(value)
                .ok_or_else(|| format!("unknown status '{value}'"))?;
            filters.push(ApplicationFilter::Status(status));
        }
    }
    if let Some(programs) = &params.program {
        for value in programs.split(',').map(str::trim).filter(|v| !v.is_empty()) {
            filters.push(ApplicationFilter::Program(value.to_string()));
        }
    }
    if let Some(from) = &params.from {
        let from = parse_date(from, false).ok_or_else(|| format!("invalid date '{from}'"))?;
        filters.push(ApplicationFilter::SubmittedFrom(from));
    }
    if let Some(to) = &params.to {
        let to = parse_date(to, true).ok_or_else(|| format!("invalid date '{to}'"))?;
        filters.push(ApplicationFilter::SubmittedTo(to));
    }
    state.set_filters(filters);

    if let Some(sort) = &params.sort {
        let sort = parse_sort(sort).ok_or_else(|| format!("unknown sort '{sort}'"))?;
        state.set_sort(Some(sort));
    }
    Ok(state)
}

fn query_rows<S, N>(
    state: &IntakeState<S, N>,
    params: &ListParams,
) -> Result<Vec<ApplicationRow>, Response>
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    let query = query_state(params).map_err(|message| {
        let payload = json!({ "error": message });
        (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
    })?;
    let records = state
        .service
        .list()
        .map_err(|error| AppError::from(error).into_response())?;
    let rows: Vec<ApplicationRow> = records.iter().map(ApplicationRow::from_record).collect();
    Ok(query.apply(&rows))
}

async fn list_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    match query_rows(state.as_ref(), &params) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(response) => response,
    }
}

async fn export_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    let rows = match query_rows(state.as_ref(), &params) {
        Ok(rows) => rows,
        Err(response) => return response,
    };
    match export::applications_csv(&rows) {
        Ok(csv) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv")],
            csv,
        )
            .into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

async fn detail_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    let record = match state.service.get(&application_id) {
        Ok(Some(record)) => record,
        Ok(None) => {
            let payload = json!({ "error": "application not found" });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
        Err(error) => return AppError::from(error).into_response(),
    };
    let documents = match state.service.get_documents(&application_id) {
        Ok(documents) => documents,
        Err(error) => return AppError::from(error).into_response(),
    };
    let payload = json!({
        "application": record,
        "documents": documents,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

async fn status_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<StatusUpdateRequest>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    let Some(status) = ApplicationStatus::parse(&request.status) else {
        let payload = json!({ "error": format!("unknown status '{}'", request.status) });
        return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
    };
    match state.service.update_status(&application_id, status) {
        Ok(()) => {
            let payload = json!({
                "applicationId": application_id,
                "status": status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(StoreError::NotFound) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

async fn delete_handler<S, N>(
    State(state): State<Arc<IntakeState<S, N>>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: ApplicationStore + 'static,
    N: NotificationSink + 'static,
{
    match state.service.delete(&application_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(StoreError::NotFound) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}
