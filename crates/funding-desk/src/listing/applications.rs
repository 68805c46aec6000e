//! Row shape and query rules for the submitted-applications list.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterRule, Searchable, SortRule};
use crate::store::{ApplicationStatus, FundingApplicationRecord};

/// Flattened view of one stored application, with the display fields pulled
/// out of the JSON payload. Unreadable payloads degrade to placeholders
/// instead of dropping the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: String,
    pub program_id: String,
    pub program_name: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub project_title: String,
    pub funding_amount: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
}

impl ApplicationRow {
    pub fn from_record(record: &FundingApplicationRecord) -> Self {
        let payload: serde_json::Value =
            serde_json::from_str(&record.payload).unwrap_or(serde_json::Value::Null);
        let text = |pointer: &str, fallback: &str| -> String {
            payload
                .pointer(pointer)
                .and_then(serde_json::Value::as_str)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };

        Self {
            id: record.id.clone(),
            program_id: record.program_id.clone(),
            program_name: record.program_name.clone(),
            applicant_name: text("/applicant/fullName", "N/A"),
            applicant_email: record.applicant_email.clone(),
            project_title: text("/project/title", "N/A"),
            funding_amount: text("/project/fundingAmount", "0"),
            status: record.status,
            submitted_at: record.submitted_at,
        }
    }

    fn funding_amount_numeric(&self) -> i64 {
        self.funding_amount.trim().parse().unwrap_or(0)
    }
}

impl Searchable for ApplicationRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.id,
            &self.applicant_name,
            &self.applicant_email,
            &self.program_name,
            &self.project_title,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationFilter {
    Status(ApplicationStatus),
    Program(String),
    SubmittedFrom(DateTime<Utc>),
    SubmittedTo(DateTime<Utc>),
}

impl FilterRule<ApplicationRow> for ApplicationFilter {
    fn category(&self) -> &'static str {
        match self {
            ApplicationFilter::Status(_) => "Status",
            ApplicationFilter::Program(_) => "Program",
            ApplicationFilter::SubmittedFrom(_) => "Submitted From",
            ApplicationFilter::SubmittedTo(_) => "Submitted To",
        }
    }

    fn matches(&self, row: &ApplicationRow) -> bool {
        match self {
            ApplicationFilter::Status(status) => row.status == *status,
            ApplicationFilter::Program(program_id) => row.program_id == *program_id,
            ApplicationFilter::SubmittedFrom(from) => row.submitted_at >= *from,
            ApplicationFilter::SubmittedTo(to) => row.submitted_at <= *to,
        }
    }

    fn label(&self) -> String {
        match self {
            ApplicationFilter::Status(status) => status.label().to_string(),
            ApplicationFilter::Program(program_id) => program_id.clone(),
            ApplicationFilter::SubmittedFrom(from) => from.format("%Y-%m-%d").to_string(),
            ApplicationFilter::SubmittedTo(to) => to.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationSort {
    NewestFirst,
    OldestFirst,
    ApplicantName,
    ProgramName,
    AmountHighToLow,
    Status,
}

impl SortRule<ApplicationRow> for ApplicationSort {
    fn compare(&self, a: &ApplicationRow, b: &ApplicationRow) -> Ordering {
        match self {
            ApplicationSort::NewestFirst => b.submitted_at.cmp(&a.submitted_at),
            ApplicationSort::OldestFirst => a.submitted_at.cmp(&b.submitted_at),
            ApplicationSort::ApplicantName => a.applicant_name.cmp(&b.applicant_name),
            ApplicationSort::ProgramName => a.program_name.cmp(&b.program_name),
            ApplicationSort::AmountHighToLow => {
                b.funding_amount_numeric().cmp(&a.funding_amount_numeric())
            }
            ApplicationSort::Status => a.status.label().cmp(b.status.label()),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApplicationSort::NewestFirst => "Newest First",
            ApplicationSort::OldestFirst => "Oldest First",
            ApplicationSort::ApplicantName => "Applicant Name",
            ApplicationSort::ProgramName => "Program Name",
            ApplicationSort::AmountHighToLow => "Amount (High to Low)",
            ApplicationSort::Status => "Status",
        }
    }
}
