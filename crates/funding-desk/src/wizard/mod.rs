//! The multi-step funding application wizard: plain-data state, config-driven
//! validation, linear navigation, and final submission.

pub mod domain;
mod machine;
pub mod router;
mod submission;
pub mod validation;

pub use domain::{
    ApplicantData, DocumentSlot, DocumentUploads, ProjectData, WizardData, WizardStep,
};
pub use machine::{NextOutcome, WizardStateMachine};
pub use submission::{
    reference_number, DocumentRef, IntakeService, Submission, SubmissionAssembler,
    SubmissionError, SubmissionReceipt,
};
pub use validation::{StepValidation, ValidationEngine};

#[cfg(test)]
mod tests;
