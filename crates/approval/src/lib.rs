//! # AcadChain Approval Module
//!
//! Workflow governing an academic record from draft to completion.
//!
//! ## Policies
//! - `MultiParty`: DRAFT → SUBMITTED → FACULTY_APPROVED → HOD_APPROVED →
//!   EXAM_LOCKED → DEAN_APPROVED → FINALIZED
//! - `Direct`: DRAFT/SUBMITTED → APPROVED by the registrar
//!
//! ## Features
//! - Each policy is enabled independently through `WorkflowConfig`
//! - Forward transitions only from the immediate predecessor
//! - Rejection from any non-terminal status returns the record to DRAFT,
//!   clears the approval chain and appends to a permanent rejection log
//! - The transition function is pure; persistence belongs to the caller

mod chain;
mod role;
mod workflow;

pub use chain::{ApprovalRecord, ApprovalStep, RejectionEntry};
pub use role::ApprovalRole;
pub use workflow::{
    ApprovalWorkflow, Transition, WorkflowAction, WorkflowConfig, WorkflowError, WorkflowPolicy,
};
