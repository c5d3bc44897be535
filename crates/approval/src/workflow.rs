//! Approval workflow logic

use crate::role::ApprovalRole;
use acad_core::RecordStatus;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

/// Named workflow that an action belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowPolicy {
    /// Five-role chain ending in FINALIZED
    MultiParty,
    /// Registrar approval ending in APPROVED
    Direct,
}

/// Which workflow policies are in force
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default = "default_multi_party")]
    pub multi_party: bool,

    #[serde(default)]
    pub direct_approval: bool,
}

fn default_multi_party() -> bool {
    true
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            multi_party: default_multi_party(),
            direct_approval: false,
        }
    }
}

impl WorkflowConfig {
    /// Both policies enabled against the same records
    pub fn both() -> Self {
        Self {
            multi_party: true,
            direct_approval: true,
        }
    }

    pub fn is_enabled(&self, policy: WorkflowPolicy) -> bool {
        match policy {
            WorkflowPolicy::MultiParty => self.multi_party,
            WorkflowPolicy::Direct => self.direct_approval,
        }
    }
}

/// Errors from the approval workflow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Workflow policy {0} is not enabled")]
    PolicyDisabled(WorkflowPolicy),

    #[error("Cannot {action} a record in status {from}; expected {expected}")]
    IllegalTransition {
        action: WorkflowAction,
        from: RecordStatus,
        expected: String,
    },

    #[error("Record is already {0} and cannot change")]
    Terminal(RecordStatus),

    #[error("Rejection reason is required")]
    MissingReason,
}

/// Forward workflow actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowAction {
    Submit,
    FacultyApprove,
    HodApprove,
    ExamSectionLock,
    DeanApprove,
    Finalize,
    DirectApprove,
}

impl WorkflowAction {
    /// Role that performs this action
    pub fn role(&self) -> ApprovalRole {
        match self {
            WorkflowAction::Submit => ApprovalRole::Department,
            WorkflowAction::FacultyApprove => ApprovalRole::Faculty,
            WorkflowAction::HodApprove => ApprovalRole::Hod,
            WorkflowAction::ExamSectionLock => ApprovalRole::ExamSection,
            WorkflowAction::DeanApprove => ApprovalRole::DeanAcademic,
            WorkflowAction::Finalize => ApprovalRole::DacMember,
            WorkflowAction::DirectApprove => ApprovalRole::Registrar,
        }
    }

    /// Status the record moves to
    pub fn target(&self) -> RecordStatus {
        match self {
            WorkflowAction::Submit => RecordStatus::Submitted,
            WorkflowAction::FacultyApprove => RecordStatus::FacultyApproved,
            WorkflowAction::HodApprove => RecordStatus::HodApproved,
            WorkflowAction::ExamSectionLock => RecordStatus::ExamLocked,
            WorkflowAction::DeanApprove => RecordStatus::DeanApproved,
            WorkflowAction::Finalize => RecordStatus::Finalized,
            WorkflowAction::DirectApprove => RecordStatus::Approved,
        }
    }

    /// Statuses this action may be taken from
    pub fn sources(&self) -> &'static [RecordStatus] {
        match self {
            WorkflowAction::Submit => &[RecordStatus::Draft],
            WorkflowAction::FacultyApprove => &[RecordStatus::Submitted],
            WorkflowAction::HodApprove => &[RecordStatus::FacultyApproved],
            WorkflowAction::ExamSectionLock => &[RecordStatus::HodApproved],
            WorkflowAction::DeanApprove => &[RecordStatus::ExamLocked],
            WorkflowAction::Finalize => &[RecordStatus::DeanApproved],
            WorkflowAction::DirectApprove => &[RecordStatus::Draft, RecordStatus::Submitted],
        }
    }

    /// Policy this action belongs to; `None` for submission, which both share
    pub fn policy(&self) -> Option<WorkflowPolicy> {
        match self {
            WorkflowAction::Submit => None,
            WorkflowAction::DirectApprove => Some(WorkflowPolicy::Direct),
            _ => Some(WorkflowPolicy::MultiParty),
        }
    }

    /// Whether reaching the target completes the record and updates standing
    pub fn completes_record(&self) -> bool {
        self.target().is_terminal()
    }

    /// Event emitted when the action commits
    pub fn event_name(&self) -> &'static str {
        match self {
            WorkflowAction::Submit => "RecordSubmittedForApproval",
            WorkflowAction::FacultyApprove => "RecordFacultyApproved",
            WorkflowAction::HodApprove => "RecordHODApproved",
            WorkflowAction::ExamSectionLock => "RecordExamLocked",
            WorkflowAction::DeanApprove => "RecordDeanApproved",
            WorkflowAction::Finalize => "RecordFinalized",
            WorkflowAction::DirectApprove => "RecordApproved",
        }
    }
}

/// A validated status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: WorkflowAction,
    pub from: RecordStatus,
    pub to: RecordStatus,
    pub role: ApprovalRole,
}

/// Pure transition function over record statuses
#[derive(Debug, Clone, Default)]
pub struct ApprovalWorkflow {
    config: WorkflowConfig,
}

impl ApprovalWorkflow {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Validate `action` from `current` and describe the resulting transition
    pub fn plan(&self, current: RecordStatus, action: WorkflowAction) -> Result<Transition, WorkflowError> {
        if let Some(policy) = action.policy() {
            if !self.config.is_enabled(policy) {
                return Err(WorkflowError::PolicyDisabled(policy));
            }
        }

        if current.is_terminal() {
            return Err(WorkflowError::Terminal(current));
        }

        if !action.sources().contains(&current) {
            let expected = action
                .sources()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(WorkflowError::IllegalTransition {
                action,
                from: current,
                expected,
            });
        }

        Ok(Transition {
            action,
            from: current,
            to: action.target(),
            role: action.role(),
        })
    }

    /// Validate a rejection from `current`
    pub fn check_rejection(&self, current: RecordStatus, reason: &str) -> Result<(), WorkflowError> {
        if reason.trim().is_empty() {
            return Err(WorkflowError::MissingReason);
        }
        if current.is_terminal() {
            return Err(WorkflowError::Terminal(current));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const CHAIN: [WorkflowAction; 6] = [
        WorkflowAction::Submit,
        WorkflowAction::FacultyApprove,
        WorkflowAction::HodApprove,
        WorkflowAction::ExamSectionLock,
        WorkflowAction::DeanApprove,
        WorkflowAction::Finalize,
    ];

    #[test]
    fn test_full_multi_party_chain() {
        let workflow = ApprovalWorkflow::default();
        let mut status = RecordStatus::Draft;
        for action in CHAIN {
            let transition = workflow.plan(status, action).unwrap();
            assert_eq!(transition.from, status);
            status = transition.to;
        }
        assert_eq!(status, RecordStatus::Finalized);
    }

    #[test]
    fn test_skipping_stage_rejected() {
        let workflow = ApprovalWorkflow::default();
        let result = workflow.plan(RecordStatus::Draft, WorkflowAction::HodApprove);
        assert!(matches!(
            result,
            Err(WorkflowError::IllegalTransition {
                from: RecordStatus::Draft,
                ..
            })
        ));

        let result = workflow.plan(RecordStatus::Submitted, WorkflowAction::DeanApprove);
        assert!(result.is_err());
    }

    #[test]
    fn test_each_action_only_from_predecessor() {
        let workflow = ApprovalWorkflow::new(WorkflowConfig::both());
        for action in WorkflowAction::iter() {
            for status in <RecordStatus as IntoEnumIterator>::iter() {
                let allowed = action.sources().contains(&status);
                assert_eq!(
                    workflow.plan(status, action).is_ok(),
                    allowed,
                    "{} from {}",
                    action,
                    status
                );
            }
        }
    }

    #[test]
    fn test_terminal_statuses_are_absorbing() {
        let workflow = ApprovalWorkflow::new(WorkflowConfig::both());
        assert_eq!(
            workflow.plan(RecordStatus::Finalized, WorkflowAction::Finalize),
            Err(WorkflowError::Terminal(RecordStatus::Finalized))
        );
        assert_eq!(
            workflow.plan(RecordStatus::Approved, WorkflowAction::DirectApprove),
            Err(WorkflowError::Terminal(RecordStatus::Approved))
        );
    }

    #[test]
    fn test_direct_policy_disabled_by_default() {
        let workflow = ApprovalWorkflow::default();
        assert_eq!(
            workflow.plan(RecordStatus::Submitted, WorkflowAction::DirectApprove),
            Err(WorkflowError::PolicyDisabled(WorkflowPolicy::Direct))
        );

        let direct_only = ApprovalWorkflow::new(WorkflowConfig {
            multi_party: false,
            direct_approval: true,
        });
        assert!(direct_only
            .plan(RecordStatus::Draft, WorkflowAction::Submit)
            .is_ok());
        assert_eq!(
            direct_only
                .plan(RecordStatus::Submitted, WorkflowAction::DirectApprove)
                .unwrap()
                .to,
            RecordStatus::Approved
        );
        assert_eq!(
            direct_only.plan(RecordStatus::Submitted, WorkflowAction::FacultyApprove),
            Err(WorkflowError::PolicyDisabled(WorkflowPolicy::MultiParty))
        );
    }

    #[test]
    fn test_rejection_rules() {
        let workflow = ApprovalWorkflow::default();
        assert!(workflow.check_rejection(RecordStatus::ExamLocked, "bad").is_ok());
        assert!(workflow.check_rejection(RecordStatus::Draft, "bad").is_ok());
        assert_eq!(
            workflow.check_rejection(RecordStatus::Submitted, "  "),
            Err(WorkflowError::MissingReason)
        );
        assert_eq!(
            workflow.check_rejection(RecordStatus::Finalized, "late"),
            Err(WorkflowError::Terminal(RecordStatus::Finalized))
        );
    }

    #[test]
    fn test_completing_actions() {
        assert!(WorkflowAction::Finalize.completes_record());
        assert!(WorkflowAction::DirectApprove.completes_record());
        assert!(!WorkflowAction::DeanApprove.completes_record());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: WorkflowConfig = serde_json::from_str("{}").unwrap();
        assert!(config.multi_party);
        assert!(!config.direct_approval);
    }
}
