//! Program configuration: which fields a funding program shows and requires,
//! its funding range, and its advertised processing time.
//!
//! A config is loaded once per program selection and stays immutable for the
//! duration of a wizard session; changing program replaces it wholesale.

mod catalog;

pub use catalog::ProgramCatalog;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Full per-program configuration as shipped in the `<key>.json` files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramConfig {
    pub program_id: String,
    pub program_name: String,
    pub funding_range: FundingRange,
    pub processing_time: ProcessingTime,
    pub steps: StepsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRange {
    pub min: i64,
    pub max: i64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTime {
    pub value: u32,
    pub unit: String,
}

impl ProcessingTime {
    pub fn display(&self) -> String {
        format!("{} {}", self.value, self.unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepsConfig {
    pub applicant_info: ApplicantStepConfig,
    pub project_details: ProjectStepConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantStepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub fields: BTreeMap<String, FieldRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectStepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub fields: BTreeMap<String, FieldRule>,
    #[serde(default)]
    pub documents: BTreeMap<String, DocumentRule>,
}

/// Validation rule for a single form field. Absent fields are simply not
/// validated; unknown keys in the config are ignored by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub visible: bool,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}

impl FieldRule {
    pub fn required() -> Self {
        Self {
            visible: true,
            required: true,
            min_length: None,
            max: None,
        }
    }

    pub fn optional() -> Self {
        Self {
            visible: true,
            required: false,
            min_length: None,
            max: None,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            required: false,
            min_length: None,
            max: None,
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRule {
    pub required: bool,
}

fn default_true() -> bool {
    true
}

/// Single source of truth for program lookup; implementations surface an
/// explicit `NotFound` instead of an absent value.
pub trait ProgramConfigLoader: Send + Sync {
    fn load(&self, key: &str) -> Result<ProgramConfig, ProgramError>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("program configuration not found for '{key}'")]
    NotFound { key: String },
    #[error("failed to read program configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid program configuration in '{file}': {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}
