use serde::{Deserialize, Serialize};

/// Ordered steps of the intake wizard. Strictly linear; no skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardStep {
    Program,
    Applicant,
    Project,
    Review,
}

pub const STEP_COUNT: usize = 4;

impl Default for WizardStep {
    fn default() -> Self {
        WizardStep::Program
    }
}

impl WizardStep {
    pub const fn index(self) -> usize {
        match self {
            WizardStep::Program => 0,
            WizardStep::Applicant => 1,
            WizardStep::Project => 2,
            WizardStep::Review => 3,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(WizardStep::Program),
            1 => Some(WizardStep::Applicant),
            2 => Some(WizardStep::Project),
            3 => Some(WizardStep::Review),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::Program => "Program Selection",
            WizardStep::Applicant => "Applicant Information",
            WizardStep::Project => "Project Details",
            WizardStep::Review => "Review & Submit",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

/// Known applicant field names, in form order. The validation engine sweeps
/// exactly this list; config entries outside it are ignored.
pub const APPLICANT_FIELDS: [&str; 8] = [
    "fullName",
    "email",
    "phone",
    "dateOfBirth",
    "address",
    "city",
    "country",
    "postalCode",
];

/// Known project field names, in form order.
pub const PROJECT_FIELDS: [&str; 6] = [
    "title",
    "description",
    "fundingAmount",
    "duration",
    "category",
    "startDate",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

impl ApplicantData {
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "fullName" => Some(&self.full_name),
            "email" => Some(&self.email),
            "phone" => Some(&self.phone),
            "dateOfBirth" => Some(&self.date_of_birth),
            "address" => Some(&self.address),
            "city" => Some(&self.city),
            "country" => Some(&self.country),
            "postalCode" => Some(&self.postal_code),
            _ => None,
        }
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "fullName" => &mut self.full_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "dateOfBirth" => &mut self.date_of_birth,
            "address" => &mut self.address,
            "city" => &mut self.city,
            "country" => &mut self.country,
            "postalCode" => &mut self.postal_code,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectData {
    pub title: String,
    pub description: String,
    pub funding_amount: String,
    pub duration: String,
    pub category: String,
    pub start_date: String,
}

impl ProjectData {
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => Some(&self.title),
            "description" => Some(&self.description),
            "fundingAmount" => Some(&self.funding_amount),
            "duration" => Some(&self.duration),
            "category" => Some(&self.category),
            "startDate" => Some(&self.start_date),
            _ => None,
        }
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "fundingAmount" => &mut self.funding_amount,
            "duration" => &mut self.duration,
            "category" => &mut self.category,
            "startDate" => &mut self.start_date,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// Upload slots checked by the project step. Only file names are carried;
/// file bytes stay with the external uploader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSlot {
    BusinessPlan,
    FinancialStatements,
}

impl DocumentSlot {
    /// Key used for this slot in the program configuration and on the wire.
    pub const fn config_key(self) -> &'static str {
        match self {
            DocumentSlot::BusinessPlan => "businessPlan",
            DocumentSlot::FinancialStatements => "financialStatements",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DocumentSlot::BusinessPlan => "Business Plan",
            DocumentSlot::FinancialStatements => "Financial Statements",
        }
    }

    pub const ALL: [DocumentSlot; 2] = [DocumentSlot::BusinessPlan, DocumentSlot::FinancialStatements];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentUploads {
    pub business_plan: Vec<String>,
    pub financial_statements: Vec<String>,
}

impl DocumentUploads {
    pub fn files(&self, slot: DocumentSlot) -> &[String] {
        match slot {
            DocumentSlot::BusinessPlan => &self.business_plan,
            DocumentSlot::FinancialStatements => &self.financial_statements,
        }
    }

    pub fn count(&self, slot: DocumentSlot) -> usize {
        self.files(slot).len()
    }

    pub fn add(&mut self, slot: DocumentSlot, file_name: impl Into<String>) {
        match slot {
            DocumentSlot::BusinessPlan => self.business_plan.push(file_name.into()),
            DocumentSlot::FinancialStatements => self.financial_statements.push(file_name.into()),
        }
    }

    pub fn remove(&mut self, slot: DocumentSlot, file_name: &str) -> bool {
        let files = match slot {
            DocumentSlot::BusinessPlan => &mut self.business_plan,
            DocumentSlot::FinancialStatements => &mut self.financial_statements,
        };
        let before = files.len();
        files.retain(|name| name != file_name);
        files.len() != before
    }

    /// Human-readable list of populated slots, "None" when empty.
    pub fn summary(&self) -> String {
        let populated: Vec<&str> = DocumentSlot::ALL
            .into_iter()
            .filter(|slot| self.count(*slot) > 0)
            .map(DocumentSlot::label)
            .collect();
        if populated.is_empty() {
            "None".to_string()
        } else {
            populated.join(", ")
        }
    }
}

/// Plain-data state container behind the wizard: the replacement for the
/// view-layer's two-way bound models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardData {
    pub selected_program: String,
    pub applicant: ApplicantData,
    pub project: ProjectData,
    pub documents: DocumentUploads,
    pub terms_accepted: bool,
}
