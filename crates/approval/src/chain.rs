//! Approval chain attached 1:1 to an academic record

use crate::role::ApprovalRole;
use acad_core::RecordStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One role-stamped approval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStep {
    pub role: ApprovalRole,
    /// Committee position of the signer, recorded for DAC sign-off
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_role: Option<String>,
    pub actor: String,
    pub organization: String,
    pub from_status: RecordStatus,
    pub to_status: RecordStatus,
    pub timestamp: DateTime<Utc>,
    pub comment: String,
    pub tx_id: String,
}

/// One rejection, kept after the chain it rejected is cleared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionEntry {
    pub actor: String,
    pub organization: String,
    pub from_status: RecordStatus,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    pub tx_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    pub record_id: String,
    pub student_id: String,
    pub department: String,
    pub semester: u8,
    /// Mirrors the academic record's status
    pub current_status: RecordStatus,
    pub approval_chain: Vec<ApprovalStep>,
    pub rejections: Vec<RejectionEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ApprovalRecord {
    pub fn open(
        record_id: &str,
        student_id: &str,
        department: &str,
        semester: u8,
        status: RecordStatus,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            record_id: record_id.to_string(),
            student_id: student_id.to_string(),
            department: department.to_string(),
            semester,
            current_status: status,
            approval_chain: Vec::new(),
            rejections: Vec::new(),
            created_at: at,
            updated_at: at,
        }
    }

    /// Append a step and move to its target status
    pub fn push_step(&mut self, step: ApprovalStep) {
        self.current_status = step.to_status;
        self.updated_at = step.timestamp;
        self.approval_chain.push(step);
    }

    /// Clear the chain, log the rejection and return to DRAFT
    pub fn reject(&mut self, entry: RejectionEntry) {
        self.approval_chain.clear();
        self.current_status = RecordStatus::Draft;
        self.updated_at = entry.timestamp;
        self.rejections.push(entry);
    }

    pub fn last_step(&self) -> Option<&ApprovalStep> {
        self.approval_chain.last()
    }
}
