//! Semester registrations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Registered,
    Completed,
    Dropped,
}

impl RegistrationStatus {
    /// Only an open registration may be closed
    pub fn can_transition_to(&self, next: RegistrationStatus) -> bool {
        matches!(
            (self, next),
            (
                RegistrationStatus::Registered,
                RegistrationStatus::Completed | RegistrationStatus::Dropped
            )
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterRegistration {
    pub registration_id: String,
    pub student_id: String,
    pub semester: u8,
    pub academic_year: String,
    pub faculty_advisor: String,
    pub status: RegistrationStatus,
    pub registered_by: String,
    pub registered_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
