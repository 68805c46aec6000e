//! Plain-text and CSV renderings of submissions and application lists.

use chrono::SecondsFormat;

use crate::listing::applications::ApplicationRow;
use crate::programs::ProgramConfig;
use crate::wizard::Submission;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("csv output was not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Review-style text summary of a submission. Steps disabled in the program
/// configuration are left out entirely.
pub fn submission_text(submission: &Submission, config: &ProgramConfig) -> String {
    let mut out = String::new();
    let mut line = |text: String| {
        out.push_str(&text);
        out.push('\n');
    };

    line("FUNDING APPLICATION".to_string());
    line("===================".to_string());
    line(format!("Program: {}", submission.program_name));
    line(format!(
        "Funding Range: {} - {} {}",
        submission.funding_range.min,
        submission.funding_range.max,
        submission.funding_range.currency
    ));
    line(format!(
        "Processing Time: {}",
        submission.processing_time.display()
    ));

    if config.steps.applicant_info.enabled {
        line(String::new());
        line("Applicant".to_string());
        line(format!("  Name: {}", submission.applicant.full_name));
        line(format!("  Email: {}", submission.applicant.email));
        line(format!("  Phone: {}", submission.applicant.phone));
        line(format!("  City: {}", submission.applicant.city));
        line(format!("  Country: {}", submission.applicant.country));
    }

    if config.steps.project_details.enabled {
        line(String::new());
        line("Project".to_string());
        line(format!("  Title: {}", submission.project.title));
        line(format!("  Description: {}", submission.project.description));
        line(format!(
            "  Funding Amount: {}",
            submission.project.funding_amount
        ));
        line(format!("  Duration: {} months", submission.project.duration));

        line(String::new());
        line("Documents".to_string());
        if submission.documents.is_empty() {
            line("  None".to_string());
        } else {
            for document in &submission.documents {
                line(format!("  {}: {}", document.document_type, document.file_name));
            }
        }
    }

    line(String::new());
    line(format!(
        "Submitted: {}",
        submission
            .submission_date
            .to_rfc3339_opts(SecondsFormat::Secs, true)
    ));
    out
}

/// One submission as key/value CSV rows.
pub fn submission_csv(submission: &Submission) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["field", "value"])?;
    writer.write_record(["programId", &submission.program_id])?;
    writer.write_record(["programName", &submission.program_name])?;
    writer.write_record(["applicantName", &submission.applicant.full_name])?;
    writer.write_record(["applicantEmail", &submission.applicant.email])?;
    writer.write_record(["projectTitle", &submission.project.title])?;
    writer.write_record(["fundingAmount", &submission.project.funding_amount])?;
    writer.write_record(["duration", &submission.project.duration])?;
    let files: Vec<&str> = submission
        .documents
        .iter()
        .map(|doc| doc.file_name.as_str())
        .collect();
    writer.write_record(["documents", &files.join("; ")])?;
    writer.write_record([
        "submissionDate",
        &submission
            .submission_date
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    ])?;
    let bytes = writer.into_inner().map_err(|error| error.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// The applications list as CSV, one row per application.
pub fn applications_csv(rows: &[ApplicationRow]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "id",
        "programId",
        "programName",
        "applicantName",
        "applicantEmail",
        "projectTitle",
        "fundingAmount",
        "status",
        "submittedAt",
    ])?;
    for row in rows {
        writer.write_record([
            row.id.as_str(),
            row.program_id.as_str(),
            row.program_name.as_str(),
            row.applicant_name.as_str(),
            row.applicant_email.as_str(),
            row.project_title.as_str(),
            row.funding_amount.as_str(),
            row.status.label(),
            &row.submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|error| error.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
