mod rules;

use serde::{Deserialize, Serialize};

use super::domain::{WizardData, WizardStep};
use crate::programs::ProgramConfig;

/// Outcome of validating one wizard step. Failure is data, never an error
/// type: an incomplete step is a normal state of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl StepValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Pure, config-driven step validator.
///
/// `validate` enumerates every failing check so the caller can surface a
/// complete list when blocking forward navigation; `is_valid` answers the
/// same question but stops at the first failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationEngine;

impl ValidationEngine {
    pub fn validate(
        &self,
        step: WizardStep,
        data: &WizardData,
        config: Option<&ProgramConfig>,
    ) -> StepValidation {
        let errors = match step {
            WizardStep::Program => rules::program_errors(data, config),
            WizardStep::Applicant => rules::applicant_errors(data, config),
            WizardStep::Project => rules::project_errors(data, config),
            WizardStep::Review => Vec::new(),
        };
        StepValidation::from_errors(errors)
    }

    pub fn is_valid(
        &self,
        step: WizardStep,
        data: &WizardData,
        config: Option<&ProgramConfig>,
    ) -> bool {
        match step {
            WizardStep::Program => rules::program_is_valid(data, config),
            WizardStep::Applicant => rules::applicant_is_valid(data, config),
            WizardStep::Project => rules::project_is_valid(data, config),
            WizardStep::Review => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::programs::{ProgramCatalog, ProgramConfigLoader};
    use crate::wizard::domain::DocumentSlot;

    fn startup_config() -> ProgramConfig {
        ProgramCatalog::builtin()
            .load("startup")
            .expect("startup program exists")
    }

    fn filled_applicant(config: &ProgramConfig) -> WizardData {
        let mut data = WizardData {
            selected_program: config.program_id.clone(),
            ..WizardData::default()
        };
        data.applicant.set_field("fullName", "Alice Uwase");
        data.applicant.set_field("email", "alice@example.com");
        data.applicant.set_field("phone", "+250788123456");
        data.applicant.set_field("dateOfBirth", "1990-04-12");
        data.applicant.set_field("city", "Kigali");
        data.applicant.set_field("country", "Rwanda");
        data
    }

    fn filled_project(config: &ProgramConfig) -> WizardData {
        let mut data = filled_applicant(config);
        data.project.set_field("title", "Cold-chain logistics");
        data.project.set_field(
            "description",
            "Last-mile refrigerated delivery for produce cooperatives.",
        );
        data.project.set_field("fundingAmount", "10000000");
        data.project.set_field("duration", "12");
        data.documents.add(DocumentSlot::BusinessPlan, "plan.pdf");
        data.documents
            .add(DocumentSlot::FinancialStatements, "fy24.xlsx");
        data
    }

    #[test]
    fn program_step_requires_selection_and_config() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = WizardData::default();

        assert!(!engine.is_valid(WizardStep::Program, &data, None));
        assert!(!engine.is_valid(WizardStep::Program, &data, Some(&config)));

        data.selected_program = "startup".to_string();
        assert!(!engine.is_valid(WizardStep::Program, &data, None));
        assert!(engine.is_valid(WizardStep::Program, &data, Some(&config)));
    }

    #[test]
    fn applicant_step_fails_closed_without_config() {
        let engine = ValidationEngine;
        let config = startup_config();
        let data = filled_applicant(&config);
        let result = engine.validate(WizardStep::Applicant, &data, None);
        assert!(!result.valid);
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn applicant_step_accepts_complete_data() {
        let engine = ValidationEngine;
        let config = startup_config();
        let data = filled_applicant(&config);
        let result = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(result.valid, "unexpected errors: {:?}", result.errors);
    }

    #[test]
    fn whitespace_only_values_do_not_satisfy_required_fields() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_applicant(&config);
        data.applicant.set_field("city", "   ");
        let result = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(!result.valid);
        assert!(result.errors.iter().any(|error| error.contains("City")));
    }

    #[test]
    fn email_gate_rejects_malformed_addresses() {
        let engine = ValidationEngine;
        let config = startup_config();
        for bad in ["foo", "foo@bar", "@bar.com", "fo o@bar.com", "foo@bar..", "foo@.com"] {
            let mut data = filled_applicant(&config);
            data.applicant.set_field("email", bad);
            assert!(
                !engine.is_valid(WizardStep::Applicant, &data, Some(&config)),
                "should reject {bad:?}"
            );
        }

        let mut data = filled_applicant(&config);
        data.applicant.set_field("email", "foo@bar.com");
        assert!(engine.is_valid(WizardStep::Applicant, &data, Some(&config)));
    }

    #[test]
    fn validation_is_monotone_in_required_fields() {
        // Filling a previously-missing required field never invalidates the step.
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_applicant(&config);
        data.applicant.set_field("phone", "");
        let before = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(!before.valid);

        data.applicant.set_field("phone", "+250788000000");
        let after = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(after.valid);
        assert!(after.errors.len() <= before.errors.len());
    }

    #[test]
    fn funding_amount_boundaries_are_inclusive() {
        let engine = ValidationEngine;
        let mut config = startup_config();
        config.funding_range.min = 1000;
        config.funding_range.max = 5000;

        for (amount, expected) in [("999", false), ("1000", true), ("5000", true), ("5001", false)]
        {
            let mut data = filled_project(&config);
            data.project.set_field("fundingAmount", amount);
            assert_eq!(
                engine.is_valid(WizardStep::Project, &data, Some(&config)),
                expected,
                "fundingAmount = {amount}"
            );
        }
    }

    #[test]
    fn description_min_length_is_enforced() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_project(&config);
        data.project.set_field("description", "too short");
        let result = engine.validate(WizardStep::Project, &data, Some(&config));
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|error| error.contains("at least 30 characters")));
    }

    #[test]
    fn duration_above_max_is_rejected() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_project(&config);
        data.project.set_field("duration", "25");
        let result = engine.validate(WizardStep::Project, &data, Some(&config));
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|error| error.contains("cannot exceed 24")));
    }

    #[test]
    fn non_numeric_duration_is_an_error_not_a_pass() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_project(&config);
        data.project.set_field("duration", "twelve");
        let result = engine.validate(WizardStep::Project, &data, Some(&config));
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|error| error.contains("Duration") && error.contains("number")));
    }

    #[test]
    fn missing_required_documents_block_the_project_step() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_project(&config);
        data.documents.business_plan.clear();
        let result = engine.validate(WizardStep::Project, &data, Some(&config));
        assert!(!result.valid);
        assert!(result
            .errors
            .iter()
            .any(|error| error.contains("Business Plan")));
    }

    #[test]
    fn enumerating_variant_reports_every_failure() {
        let engine = ValidationEngine;
        let config = startup_config();
        let mut data = filled_project(&config);
        data.project.set_field("description", "short");
        data.project.set_field("duration", "99");
        data.project.set_field("fundingAmount", "1");
        data.documents.business_plan.clear();

        let result = engine.validate(WizardStep::Project, &data, Some(&config));
        assert!(!result.valid);
        // minLength, duration max, funding range, and the missing document
        // must all be present at once.
        assert!(result.errors.len() >= 4, "errors: {:?}", result.errors);
    }

    #[test]
    fn degenerate_all_required_config_still_validates() {
        // The hardcoded-field controller variants behave like a config with
        // every field visible+required and no numeric limits.
        use crate::programs::FieldRule;

        let engine = ValidationEngine;
        let mut config = startup_config();
        for rule in config.steps.applicant_info.fields.values_mut() {
            *rule = FieldRule::required();
        }

        let mut data = filled_applicant(&config);
        let partial = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(!partial.valid, "address/postalCode now required");

        data.applicant.set_field("address", "KG 9 Ave 15");
        data.applicant.set_field("postalCode", "00000");
        let complete = engine.validate(WizardStep::Applicant, &data, Some(&config));
        assert!(complete.valid, "errors: {:?}", complete.errors);
    }
}
