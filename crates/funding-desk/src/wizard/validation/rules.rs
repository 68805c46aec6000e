use std::collections::BTreeMap;

use super::super::domain::{DocumentSlot, WizardData, APPLICANT_FIELDS, PROJECT_FIELDS};
use crate::programs::{FieldRule, ProgramConfig};

/// Display label for a form field key, used in user-facing error messages.
fn field_label(name: &str) -> &'static str {
    match name {
        "fullName" => "Full Name",
        "email" => "Email",
        "phone" => "Phone",
        "dateOfBirth" => "Date of Birth",
        "address" => "Address",
        "city" => "City",
        "country" => "Country",
        "postalCode" => "Postal Code",
        "title" => "Project Title",
        "description" => "Description",
        "fundingAmount" => "Funding Amount",
        "duration" => "Duration",
        "category" => "Category",
        "startDate" => "Start Date",
        _ => "Field",
    }
}

/// Simple email shape: non-empty local part, exactly one `@`, a dot inside
/// the domain with non-empty host and tld, no whitespace anywhere.
pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.find('.') {
        Some(0) => false,
        Some(_) => !domain.ends_with('.'),
        None => false,
    }
}

fn parse_amount(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or("").is_empty()
}

fn required_visible(rule: &FieldRule) -> bool {
    rule.visible && rule.required
}

// ---- Program step ----

pub(crate) fn program_is_valid(data: &WizardData, config: Option<&ProgramConfig>) -> bool {
    !data.selected_program.trim().is_empty() && config.is_some()
}

pub(crate) fn program_errors(data: &WizardData, config: Option<&ProgramConfig>) -> Vec<String> {
    let mut errors = Vec::new();
    if data.selected_program.trim().is_empty() {
        errors.push("Please select a funding program".to_string());
    } else if config.is_none() {
        errors.push("Program configuration is not loaded".to_string());
    }
    errors
}

// ---- Applicant step ----

fn email_gate_passes(fields: &BTreeMap<String, FieldRule>, data: &WizardData) -> bool {
    match fields.get("email") {
        Some(rule) if rule.visible && !data.applicant.email.is_empty() => {
            is_valid_email(&data.applicant.email)
        }
        _ => true,
    }
}

pub(crate) fn applicant_is_valid(data: &WizardData, config: Option<&ProgramConfig>) -> bool {
    let Some(config) = config else {
        return false;
    };
    let fields = &config.steps.applicant_info.fields;

    for name in APPLICANT_FIELDS {
        let Some(rule) = fields.get(name) else {
            continue;
        };
        if required_visible(rule) && is_blank(data.applicant.field(name)) {
            return false;
        }
    }

    email_gate_passes(fields, data)
}

pub(crate) fn applicant_errors(data: &WizardData, config: Option<&ProgramConfig>) -> Vec<String> {
    let Some(config) = config else {
        return vec!["Program configuration is not loaded".to_string()];
    };
    let fields = &config.steps.applicant_info.fields;
    let mut errors = Vec::new();

    for name in APPLICANT_FIELDS {
        let Some(rule) = fields.get(name) else {
            continue;
        };
        if required_visible(rule) && is_blank(data.applicant.field(name)) {
            errors.push(format!("{} is required", field_label(name)));
        }
    }

    if !email_gate_passes(fields, data) {
        errors.push("Email address is not valid".to_string());
    }

    errors
}

// ---- Project step ----

pub(crate) fn project_is_valid(data: &WizardData, config: Option<&ProgramConfig>) -> bool {
    let Some(config) = config else {
        return false;
    };
    let step = &config.steps.project_details;

    for name in PROJECT_FIELDS {
        let Some(rule) = step.fields.get(name) else {
            continue;
        };
        if !rule.visible {
            continue;
        }
        let value = data.project.field(name).unwrap_or("");
        if rule.required && value.trim().is_empty() {
            return false;
        }
        if let Some(min_length) = rule.min_length {
            if value.len() < min_length {
                return false;
            }
        }
        if let Some(max) = rule.max {
            if !value.trim().is_empty() {
                match parse_amount(value) {
                    Some(parsed) if parsed <= max => {}
                    _ => return false,
                }
            }
        }
    }

    if !data.project.funding_amount.trim().is_empty() {
        let range = &config.funding_range;
        match parse_amount(&data.project.funding_amount) {
            Some(amount) if amount >= range.min && amount <= range.max => {}
            _ => return false,
        }
    }

    for slot in DocumentSlot::ALL {
        let required = step
            .documents
            .get(slot.config_key())
            .map(|rule| rule.required)
            .unwrap_or(false);
        if required && data.documents.count(slot) == 0 {
            return false;
        }
    }

    true
}

pub(crate) fn project_errors(data: &WizardData, config: Option<&ProgramConfig>) -> Vec<String> {
    let Some(config) = config else {
        return vec!["Program configuration is not loaded".to_string()];
    };
    let step = &config.steps.project_details;
    let mut errors = Vec::new();

    for name in PROJECT_FIELDS {
        let Some(rule) = step.fields.get(name) else {
            continue;
        };
        if !rule.visible {
            continue;
        }
        let value = data.project.field(name).unwrap_or("");
        if rule.required && value.trim().is_empty() {
            errors.push(format!("{} is required", field_label(name)));
        }
        if let Some(min_length) = rule.min_length {
            if value.len() < min_length {
                errors.push(format!(
                    "{} must be at least {} characters",
                    field_label(name),
                    min_length
                ));
            }
        }
        if let Some(max) = rule.max {
            if !value.trim().is_empty() {
                match parse_amount(value) {
                    Some(parsed) if parsed <= max => {}
                    Some(_) => {
                        errors.push(format!(
                            "{} cannot exceed {} months",
                            field_label(name),
                            max
                        ));
                    }
                    None => {
                        errors.push(format!("{} must be a number", field_label(name)));
                    }
                }
            }
        }
    }

    if !data.project.funding_amount.trim().is_empty() {
        let range = &config.funding_range;
        match parse_amount(&data.project.funding_amount) {
            Some(amount) if amount >= range.min && amount <= range.max => {}
            Some(_) => errors.push(format!(
                "Funding amount must be between {} and {}",
                range.min, range.max
            )),
            None => errors.push("Funding Amount must be a number".to_string()),
        }
    }

    for slot in DocumentSlot::ALL {
        let required = step
            .documents
            .get(slot.config_key())
            .map(|rule| rule.required)
            .unwrap_or(false);
        if required && data.documents.count(slot) == 0 {
            errors.push(format!("{} document is required", slot.label()));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_edge_cases() {
        assert!(is_valid_email("foo@bar.com"));
        assert!(is_valid_email("a.b+c@sub.domain.rw"));
        assert!(!is_valid_email("foo"));
        assert!(!is_valid_email("foo@bar"));
        assert!(!is_valid_email("@bar.com"));
        assert!(!is_valid_email("foo@bar."));
        assert!(!is_valid_email("foo@.bar"));
        assert!(!is_valid_email("foo bar@baz.com"));
        assert!(!is_valid_email("foo@bar@baz.com"));
    }

    #[test]
    fn amounts_tolerate_surrounding_whitespace() {
        assert_eq!(parse_amount(" 12 "), Some(12));
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount("twelve"), None);
    }
}
