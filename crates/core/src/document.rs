//! Supporting documents registered by content hash

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

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
pub enum DocumentType {
    GradeSheet,
    DegreeCert,
    Transcript,
    NationalId,
    Photo,
    Marksheet,
    Other,
}

/// Review pipeline of a document. Stages are totally ordered.
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
pub enum DocumentStatus {
    Uploaded,
    UnderReview,
    Authenticated,
    Approved,
    OnChain,
}

impl DocumentStatus {
    /// Position in the pipeline, 0 through 4
    pub fn stage(&self) -> u8 {
        match self {
            DocumentStatus::Uploaded => 0,
            DocumentStatus::UnderReview => 1,
            DocumentStatus::Authenticated => 2,
            DocumentStatus::Approved => 3,
            DocumentStatus::OnChain => 4,
        }
    }

    /// Advance exactly one stage, or reset to `Uploaded` from anywhere
    pub fn can_transition_to(&self, next: DocumentStatus) -> bool {
        next == DocumentStatus::Uploaded || next.stage() == self.stage() + 1
    }

    /// Whether a document at this stage has passed authentication
    pub fn is_authenticated(&self) -> bool {
        self.stage() >= DocumentStatus::Authenticated.stage()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
    pub document_id: String,
    pub student_id: String,
    pub document_type: DocumentType,
    /// Lower-case hex SHA-256, unique across all documents
    pub document_hash: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<u8>,
    pub uploaded_by: String,
    pub uploaded_at: DateTime<Utc>,
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
    pub status: DocumentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub modified_by: String,
    pub modified_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_forward_steps_are_single_stage() {
        use DocumentStatus::*;
        assert!(Uploaded.can_transition_to(UnderReview));
        assert!(UnderReview.can_transition_to(Authenticated));
        assert!(Authenticated.can_transition_to(Approved));
        assert!(Approved.can_transition_to(OnChain));

        assert!(!Uploaded.can_transition_to(Authenticated));
        assert!(!UnderReview.can_transition_to(OnChain));
        assert!(!Approved.can_transition_to(UnderReview));
        assert!(!OnChain.can_transition_to(OnChain));
    }

    #[test]
    fn test_reset_always_allowed() {
        for status in DocumentStatus::iter() {
            assert!(status.can_transition_to(DocumentStatus::Uploaded));
        }
    }

    #[test]
    fn test_authenticated_from_third_stage() {
        use DocumentStatus::*;
        assert!(!Uploaded.is_authenticated());
        assert!(!UnderReview.is_authenticated());
        assert!(Authenticated.is_authenticated());
        assert!(Approved.is_authenticated());
        assert!(OnChain.is_authenticated());
    }

    #[test]
    fn test_stage_order() {
        let stages: Vec<u8> = DocumentStatus::iter().map(|s| s.stage()).collect();
        assert_eq!(stages, vec![0, 1, 2, 3, 4]);
    }
}
