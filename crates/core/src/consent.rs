//! Consent granted by a student to a named requester

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// What a consent covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentScope {
    /// One semester's records
    Semester { semester: u8 },
    /// Every record of the student
    FullRecord,
}

impl ConsentScope {
    /// Whether a record of `semester` falls inside this scope
    pub fn covers(&self, semester: u8) -> bool {
        match self {
            ConsentScope::Semester { semester: scoped } => *scoped == semester,
            ConsentScope::FullRecord => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Active,
    Revoked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentRecord {
    pub consent_id: String,
    pub student_id: String,
    pub requester_id: String,
    pub scope: ConsentScope,
    pub status: ConsentStatus,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl ConsentRecord {
    pub fn is_active(&self) -> bool {
        self.status == ConsentStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_coverage() {
        let semester = ConsentScope::Semester { semester: 3 };
        assert!(semester.covers(3));
        assert!(!semester.covers(4));
        assert!(ConsentScope::FullRecord.covers(8));
    }

    #[test]
    fn test_scope_serialization() {
        let json = serde_json::to_string(&ConsentScope::Semester { semester: 2 }).unwrap();
        assert_eq!(json, r#"{"type":"SEMESTER","semester":2}"#);
        let full: ConsentScope = serde_json::from_str(r#"{"type":"FULL_RECORD"}"#).unwrap();
        assert_eq!(full, ConsentScope::FullRecord);
    }
}
