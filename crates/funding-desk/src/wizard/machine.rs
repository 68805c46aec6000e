use serde::{Deserialize, Serialize};

use super::domain::{DocumentSlot, WizardData, WizardStep, STEP_COUNT};
use super::validation::{StepValidation, ValidationEngine};
use crate::programs::{ProgramConfig, ProgramConfigLoader, ProgramError};

/// Result of a forward-navigation attempt. A rejected transition is a normal
/// outcome, not an error: the machine stays put and hands back the full
/// error list for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextOutcome {
    pub advanced: bool,
    pub errors: Vec<String>,
}

impl NextOutcome {
    fn advanced() -> Self {
        Self {
            advanced: true,
            errors: Vec::new(),
        }
    }

    fn rejected(errors: Vec<String>) -> Self {
        Self {
            advanced: false,
            errors,
        }
    }
}

/// Linear four-step intake wizard. Step `validated` flags are recomputed
/// exclusively from [`ValidationEngine`] outputs; nothing sets them by hand.
#[derive(Debug, Clone, Default)]
pub struct WizardStateMachine {
    engine: ValidationEngine,
    current: WizardStep,
    validated: [bool; STEP_COUNT],
    data: WizardData,
    config: Option<ProgramConfig>,
    completed: bool,
}

impl WizardStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn data(&self) -> &WizardData {
        &self.data
    }

    pub fn config(&self) -> Option<&ProgramConfig> {
        self.config.as_ref()
    }

    pub fn is_validated(&self, step: WizardStep) -> bool {
        self.validated[step.index()]
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Full validation snapshot of a step against the current data and
    /// config, without mutating the `validated` flags.
    pub fn validate_step(&self, step: WizardStep) -> StepValidation {
        self.engine.validate(step, &self.data, self.config.as_ref())
    }

    fn revalidate(&mut self, step: WizardStep) {
        self.validated[step.index()] = self
            .engine
            .is_valid(step, &self.data, self.config.as_ref());
    }

    /// Load a program config and make it the active one. Selecting a program
    /// resets the applicant and project steps; a load failure leaves the
    /// machine exactly where it was (still on the Program step).
    pub fn select_program(
        &mut self,
        loader: &dyn ProgramConfigLoader,
        key: &str,
    ) -> Result<(), ProgramError> {
        if key.trim().is_empty() {
            self.clear_program();
            return Ok(());
        }

        let config = loader.load(key)?;
        self.data.selected_program = key.to_string();
        self.config = Some(config);
        self.reset_applicant_step();
        self.reset_project_step();
        self.revalidate(WizardStep::Program);
        Ok(())
    }

    pub fn clear_program(&mut self) {
        self.data.selected_program.clear();
        self.config = None;
        self.revalidate(WizardStep::Program);
    }

    fn reset_applicant_step(&mut self) {
        self.data.applicant = Default::default();
        self.revalidate(WizardStep::Applicant);
    }

    fn reset_project_step(&mut self) {
        self.data.project = Default::default();
        self.data.documents = Default::default();
        self.revalidate(WizardStep::Project);
    }

    pub fn set_applicant_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let known = self.data.applicant.set_field(name, value);
        if known {
            self.revalidate(WizardStep::Applicant);
        }
        known
    }

    pub fn set_project_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let known = self.data.project.set_field(name, value);
        if known {
            self.revalidate(WizardStep::Project);
        }
        known
    }

    pub fn upload_document(&mut self, slot: DocumentSlot, file_name: impl Into<String>) {
        self.data.documents.add(slot, file_name);
        self.revalidate(WizardStep::Project);
    }

    pub fn remove_document(&mut self, slot: DocumentSlot, file_name: &str) -> bool {
        let removed = self.data.documents.remove(slot, file_name);
        if removed {
            self.revalidate(WizardStep::Project);
        }
        removed
    }

    pub fn set_terms(&mut self, accepted: bool) {
        self.data.terms_accepted = accepted;
    }

    /// Jump to a step by index. Moving forward lazily revalidates the step
    /// just left behind, so returning to fix data gets re-checked without a
    /// continuous sweep.
    pub fn activate(&mut self, index: usize) -> bool {
        let Some(step) = WizardStep::from_index(index) else {
            return false;
        };
        let moving_forward = step.index() > self.current.index();
        self.current = step;
        if moving_forward {
            if let Some(previous) = step.previous() {
                self.revalidate(previous);
            }
        }
        true
    }

    /// Re-validate the current step and advance by exactly one on success.
    /// At the terminal Review step this is a no-op.
    pub fn next(&mut self) -> NextOutcome {
        let validation = self
            .engine
            .validate(self.current, &self.data, self.config.as_ref());
        self.validated[self.current.index()] = validation.valid;

        if !validation.valid {
            return NextOutcome::rejected(validation.errors);
        }

        match self.current.next() {
            Some(step) => {
                self.current = step;
                NextOutcome::advanced()
            }
            None => NextOutcome::rejected(Vec::new()),
        }
    }

    /// Always succeeds; floored at the Program step. Does not re-validate.
    pub fn back(&mut self) {
        if let Some(previous) = self.current.previous() {
            self.current = previous;
        }
    }

    /// Reset everything to the initial empty state. Idempotent.
    pub fn discard_progress(&mut self) {
        self.current = WizardStep::Program;
        self.validated = [false; STEP_COUNT];
        self.data = WizardData::default();
        self.config = None;
        self.completed = false;
    }

    /// Mark the wizard complete once the Review step has been reached. The
    /// Review step itself carries no validation; the terms gate is applied
    /// at submit time.
    pub fn complete(&mut self) -> bool {
        if self.current == WizardStep::Review {
            self.completed = true;
        }
        self.completed
    }
}
