//! Student master data and the private details held off the shared log

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Enrollment lifecycle of a student
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Graduated,
    Withdrawn,
    Cancelled,
    TemporaryWithdrawal,
}

impl StudentStatus {
    /// Statuses that may only be entered with a recorded reason
    pub fn requires_reason(&self) -> bool {
        matches!(self, StudentStatus::Cancelled | StudentStatus::Withdrawn)
    }
}

/// Public student record, keyed by roll number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub enrollment_year: i32,
    pub email: String,
    pub admission_category: String,
    pub status: StudentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,
    pub total_credits_earned: Decimal,
    pub current_cgpa: Decimal,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: String,
    pub modified_at: DateTime<Utc>,
}

impl Student {
    /// Stamp a modification
    pub fn touch(&mut self, actor: &str, at: DateTime<Utc>) {
        self.modified_by = actor.to_string();
        self.modified_at = at;
    }
}

/// Contact and identity details stored in the restricted partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPrivateDetails {
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    /// Hex SHA-256 of the national identity number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_id_hash: Option<String>,
}
