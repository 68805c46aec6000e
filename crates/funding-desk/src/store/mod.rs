//! Contracts for the external CRUD/query service that persists submitted
//! applications, their documents, the books catalog, and notifications.
//!
//! The core never talks to a concrete backend; everything goes through these
//! traits so the service layer can be exercised in isolation.

mod memory;

pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of a persisted funding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    /// Wire form used by the store and the list filters.
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "SUBMITTED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SUBMITTED" => Some(ApplicationStatus::Submitted),
            "UNDER_REVIEW" => Some(ApplicationStatus::UnderReview),
            "APPROVED" => Some(ApplicationStatus::Approved),
            "REJECTED" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingApplicationRecord {
    pub id: String,
    pub program_id: String,
    pub program_name: String,
    /// Full submission snapshot as a JSON string, exactly as assembled.
    pub payload: String,
    pub status: ApplicationStatus,
    pub applicant_email: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDocumentRecord {
    pub application_id: String,
    pub document_type: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author_id: String,
    pub author_name: String,
    pub price: f64,
    pub stock: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
}

/// Outbound notification before the store assigns id/timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub priority: NotificationPriority,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_entity_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction for funding applications and their document rows.
pub trait ApplicationStore: Send + Sync {
    /// Persist a new application. An empty `id` asks the store to assign one.
    fn create(
        &self,
        record: FundingApplicationRecord,
    ) -> Result<FundingApplicationRecord, StoreError>;
    fn create_documents(&self, documents: Vec<ApplicationDocumentRecord>)
        -> Result<(), StoreError>;
    fn fetch(&self, id: &str) -> Result<Option<FundingApplicationRecord>, StoreError>;
    fn fetch_documents(
        &self,
        application_id: &str,
    ) -> Result<Vec<ApplicationDocumentRecord>, StoreError>;
    /// All applications ordered by submission time, newest first.
    fn list(&self) -> Result<Vec<FundingApplicationRecord>, StoreError>;
    fn update_status(&self, id: &str, status: ApplicationStatus) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Storage abstraction for the books catalog.
pub trait BookStore: Send + Sync {
    fn list_books(&self) -> Result<Vec<BookRecord>, StoreError>;
    fn create_book(&self, book: BookRecord) -> Result<BookRecord, StoreError>;
}

/// Fire-and-forget notification surface. Callers never depend on the result
/// beyond logging it.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
