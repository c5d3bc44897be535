//! Approval workflow operations
//!
//! Each stage validates the transition with `ApprovalWorkflow::plan`, checks
//! the caller against the stage role, appends one approval step and moves
//! the record's status index. The completing stage of either policy
//! aggregates standing and writes it to the record and the student.

use crate::aggregation;
use crate::error::ContractResult;
use crate::events::{self, EventKind};
use crate::store;
use crate::AcademicContract;
use acad_approval::{ApprovalRecord, ApprovalStep, RejectionEntry, WorkflowAction};
use acad_core::validation;
use acad_core::{AcademicRecord, Student};
use acad_ledger::TxContext;
use serde_json::json;

impl AcademicContract {
    pub fn submit_for_approval(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::Submit, None, comment)
    }

    pub fn faculty_approve(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::FacultyApprove, None, comment)
    }

    pub fn hod_approve(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::HodApprove, None, comment)
    }

    pub fn exam_section_lock(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::ExamSectionLock, None, comment)
    }

    pub fn dean_approve(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::DeanApprove, None, comment)
    }

    /// Final DAC stage; completes the record. `member_role` names the
    /// committee position that signed and is kept on the approval step.
    pub fn finalize_record(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        member_role: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        validation::require("member role", member_role)?;
        self.advance(
            ctx,
            record_id,
            WorkflowAction::Finalize,
            Some(member_role.trim()),
            comment,
        )
    }

    /// Direct registrar approval; completes the record
    pub fn approve_record(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        self.advance(ctx, record_id, WorkflowAction::DirectApprove, None, comment)
    }

    fn advance(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        action: WorkflowAction,
        member_role: Option<&str>,
        comment: &str,
    ) -> ContractResult<AcademicRecord> {
        let old: AcademicRecord = store::require(ctx, record_id)?;
        let transition = self.workflow.plan(old.status, action)?;
        self.access
            .require_stage(ctx.client_identity(), transition.role, &old.department)?;

        let now = ctx.tx_timestamp();
        let identity = ctx.client_identity().clone();

        let approval_before = store::load::<ApprovalRecord>(ctx, record_id)?;
        let mut approval = approval_before.clone().unwrap_or_else(|| {
            ApprovalRecord::open(
                &old.record_id,
                &old.student_id,
                &old.department,
                old.semester,
                old.status,
                now,
            )
        });
        approval.push_step(ApprovalStep {
            role: transition.role,
            member_role: member_role.map(str::to_string),
            actor: identity.id.clone(),
            organization: identity.msp_id.clone(),
            from_status: transition.from,
            to_status: transition.to,
            timestamp: now,
            comment: comment.to_string(),
            tx_id: ctx.tx_id().to_string(),
        });

        let mut record = old.clone();
        record.status = transition.to;
        record.modified_at = now;

        if action.completes_record() {
            // Aggregated from the pre-transition view; the current record is added once
            let aggregate = aggregation::aggregate(ctx, &old)?;
            record.cgpa = Some(aggregate.as_of_semester.cgpa);
            record.approved_by = Some(identity.id.clone());
            record.approved_at = Some(now);

            let student_before: Student = store::require(ctx, &old.student_id)?;
            let mut student = student_before.clone();
            student.current_cgpa = aggregate.overall.cgpa;
            student.total_credits_earned = aggregate.overall.total_credits;
            student.touch(&identity.id, now);
            store::replace(ctx, &student_before, &student)?;

            tracing::info!(
                student = %student.roll_number,
                cgpa = %student.current_cgpa,
                credits = %student.total_credits_earned,
                "student standing updated"
            );
        }

        store::replace(ctx, &old, &record)?;
        match approval_before {
            Some(ref before) => store::replace(ctx, before, &approval)?,
            None => store::insert(ctx, &approval)?,
        }

        ctx.set_event(
            action.event_name(),
            &json!({
                "recordId": record_id,
                "studentId": record.student_id,
                "fromStatus": transition.from,
                "toStatus": transition.to,
                "actor": identity.id,
                "memberRole": member_role,
                "cgpa": record.cgpa,
            }),
        )?;

        tracing::info!(
            record_id = %record_id,
            from = %transition.from,
            to = %transition.to,
            role = %transition.role,
            "workflow stage recorded"
        );
        Ok(record)
    }

    /// Send a record back to DRAFT, clearing its approval chain
    pub fn reject_record(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        reason: &str,
    ) -> ContractResult<AcademicRecord> {
        let old: AcademicRecord = store::require(ctx, record_id)?;
        self.workflow.check_rejection(old.status, reason)?;
        // Any reviewer in scope may reject, whatever stage role they hold
        self.access.require_department(ctx.client_identity(), &old.department)?;

        let now = ctx.tx_timestamp();
        let identity = ctx.client_identity().clone();
        let reason = reason.trim().to_string();

        let approval_before = store::load::<ApprovalRecord>(ctx, record_id)?;
        let mut approval = approval_before.clone().unwrap_or_else(|| {
            ApprovalRecord::open(
                &old.record_id,
                &old.student_id,
                &old.department,
                old.semester,
                old.status,
                now,
            )
        });
        approval.reject(RejectionEntry {
            actor: identity.id.clone(),
            organization: identity.msp_id.clone(),
            from_status: old.status,
            reason: reason.clone(),
            timestamp: now,
            tx_id: ctx.tx_id().to_string(),
        });

        let mut record = old.clone();
        record.status = approval.current_status;
        record.rejection_note = Some(reason.clone());
        record.modified_at = now;

        store::replace(ctx, &old, &record)?;
        match approval_before {
            Some(ref before) => store::replace(ctx, before, &approval)?,
            None => store::insert(ctx, &approval)?,
        }

        events::emit(
            ctx,
            EventKind::RecordRejected,
            &json!({
                "recordId": record_id,
                "fromStatus": old.status,
                "reason": reason,
                "actor": identity.id,
            }),
        )?;

        tracing::info!(record_id = %record_id, from = %old.status, "record rejected to draft");
        Ok(record)
    }

    /// Stored approval chain, or an empty view for records not yet in the workflow
    pub fn get_approval_status(&self, ctx: &TxContext<'_>, record_id: &str) -> ContractResult<ApprovalRecord> {
        let record: AcademicRecord = store::require(ctx, record_id)?;
        self.access.require_department(ctx.client_identity(), &record.department)?;

        Ok(store::load::<ApprovalRecord>(ctx, record_id)?.unwrap_or_else(|| {
            ApprovalRecord::open(
                &record.record_id,
                &record.student_id,
                &record.department,
                record.semester,
                record.status,
                record.modified_at,
            )
        }))
    }
}
