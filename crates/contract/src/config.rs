//! Contract configuration
//!
//! Organization names, claim names and limits are configurable via file,
//! not hardcoded.

use acad_approval::WorkflowConfig;
use chrono::Months;
use serde::{Deserialize, Serialize};

/// Organizations and attribute claims the access policy evaluates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Central registrar organization; bypasses department scoping
    #[serde(default = "default_central_org")]
    pub central_org: String,

    /// Organization of department staff
    #[serde(default = "default_department_org")]
    pub department_org: String,

    /// Organization of third-party verifiers
    #[serde(default = "default_verifier_org")]
    pub verifier_org: String,

    #[serde(default = "default_department_attribute")]
    pub department_attribute: String,

    #[serde(default = "default_role_attribute")]
    pub role_attribute: String,

    #[serde(default = "default_roll_number_attribute")]
    pub roll_number_attribute: String,
}

/// Configuration for the academic records contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Institutional domain every student email must belong to
    #[serde(default = "default_student_email_domain")]
    pub student_email_domain: String,

    /// Private collection holding student contact and identity details
    #[serde(default = "default_private_collection")]
    pub private_collection: String,

    /// Program named on degree-class certificates
    #[serde(default = "default_degree_program")]
    pub degree_program: String,

    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Validity of bonafide certificates, in months from issue
    #[serde(default = "default_bonafide_validity_months")]
    pub bonafide_validity_months: u32,

    #[serde(default = "default_min_revocation_reason_len")]
    pub min_revocation_reason_len: usize,
}

// Default value functions for serde
fn default_central_org() -> String {
    "NITWarangalMSP".to_string()
}

fn default_department_org() -> String {
    "DepartmentsMSP".to_string()
}

fn default_verifier_org() -> String {
    "VerifiersMSP".to_string()
}

fn default_department_attribute() -> String {
    "department".to_string()
}

fn default_role_attribute() -> String {
    "role".to_string()
}

fn default_roll_number_attribute() -> String {
    "rollNumber".to_string()
}

fn default_student_email_domain() -> String {
    "student.nitw.ac.in".to_string()
}

fn default_private_collection() -> String {
    "studentPrivateCollection".to_string()
}

fn default_degree_program() -> String {
    "B.Tech".to_string()
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    100
}

fn default_bonafide_validity_months() -> u32 {
    6
}

fn default_min_revocation_reason_len() -> usize {
    10
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            central_org: default_central_org(),
            department_org: default_department_org(),
            verifier_org: default_verifier_org(),
            department_attribute: default_department_attribute(),
            role_attribute: default_role_attribute(),
            roll_number_attribute: default_roll_number_attribute(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            access: AccessConfig::default(),
            workflow: WorkflowConfig::default(),
            student_email_domain: default_student_email_domain(),
            private_collection: default_private_collection(),
            degree_program: default_degree_program(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            bonafide_validity_months: default_bonafide_validity_months(),
            min_revocation_reason_len: default_min_revocation_reason_len(),
        }
    }
}

impl ContractConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Requested page size, or the default when outside (0, max]
    pub fn page_size(&self, requested: usize) -> usize {
        if requested == 0 || requested > self.max_page_size {
            self.default_page_size
        } else {
            requested
        }
    }

    /// Bonafide validity as a chrono month span
    pub fn bonafide_validity(&self) -> Months {
        Months::new(self.bonafide_validity_months)
    }
}
