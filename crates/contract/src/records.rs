//! Academic record operations
//!
//! Records are created in DRAFT and move only through the workflow
//! operations in `workflow`. Revision and deletion are limited to drafts.

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store::{self, PaginatedQueryResult};
use crate::AcademicContract;
use acad_approval::ApprovalRecord;
use acad_core::validation::{self, parse_enum};
use acad_core::{AcademicRecord, CourseEntry, RecordStatus, SemesterSummary, Student, ValidationError};
use acad_ledger::TxContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::IntoEnumIterator;

/// One graded course as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    pub course_code: String,
    pub course_name: String,
    pub credits: Decimal,
    pub grade: String,
    pub department: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAcademicRecord {
    pub record_id: String,
    pub student_id: String,
    pub semester: u8,
    pub academic_year: String,
    pub department: String,
    pub courses: Vec<CourseInput>,
}

/// Validate every course and the semester credit total
fn build_courses(inputs: Vec<CourseInput>) -> ContractResult<Vec<CourseEntry>> {
    if inputs.is_empty() {
        return Err(ValidationError::NoCourses.into());
    }

    let courses = inputs
        .iter()
        .map(|c| CourseEntry::new(&c.course_code, &c.course_name, c.credits, &c.grade, &c.department))
        .collect::<Result<Vec<_>, _>>()?;

    validation::validate_semester_credits(SemesterSummary::from_courses(&courses).total_credits)?;
    Ok(courses)
}

impl AcademicContract {
    pub fn create_academic_record(
        &self,
        ctx: &mut TxContext<'_>,
        input: NewAcademicRecord,
    ) -> ContractResult<AcademicRecord> {
        let department = validation::normalize_department(&input.department)?;
        self.access.require_department(ctx.client_identity(), &department)?;

        validation::validate_identifier("record id", &input.record_id)?;
        validation::validate_semester(input.semester)?;
        validation::validate_identifier("academic year", &input.academic_year)?;
        let courses = build_courses(input.courses)?;

        if store::exists::<AcademicRecord>(ctx, &input.record_id)? {
            return Err(ContractError::already_exists("academic record", &input.record_id));
        }
        if !store::exists::<Student>(ctx, &input.student_id)? {
            return Err(ContractError::not_found("student", &input.student_id));
        }

        let now = ctx.tx_timestamp();
        let mut record = AcademicRecord {
            record_id: input.record_id,
            student_id: input.student_id,
            department,
            semester: input.semester,
            academic_year: input.academic_year,
            courses: Vec::new(),
            total_credits: Decimal::ZERO,
            sgpa: Decimal::ZERO,
            cgpa: None,
            status: RecordStatus::Draft,
            rejection_note: None,
            submitted_by: ctx.client_identity().id.clone(),
            submitted_at: now,
            approved_by: None,
            approved_at: None,
            modified_at: now,
        };
        record.set_courses(courses);

        store::insert(ctx, &record)?;
        events::emit(
            ctx,
            EventKind::RecordCreated,
            &json!({
                "recordId": record.record_id,
                "studentId": record.student_id,
                "semester": record.semester,
                "sgpa": record.sgpa,
                "totalCredits": record.total_credits,
            }),
        )?;

        tracing::info!(
            record_id = %record.record_id,
            student = %record.student_id,
            semester = record.semester,
            sgpa = %record.sgpa,
            "academic record created"
        );
        Ok(record)
    }

    /// Fetch one record; department callers only see their own department
    pub fn get_academic_record(&self, ctx: &TxContext<'_>, record_id: &str) -> ContractResult<AcademicRecord> {
        let record: AcademicRecord = store::require(ctx, record_id)?;
        self.access.require_department(ctx.client_identity(), &record.department)?;
        Ok(record)
    }

    pub fn get_all_academic_records(&self, ctx: &TxContext<'_>) -> ContractResult<Vec<AcademicRecord>> {
        let identity = ctx.client_identity();
        let mut records: Vec<AcademicRecord> = store::scan(ctx, schema::RECORD_BY_DEPARTMENT, &[])?;
        records.retain(|r| self.access.can_view_department(identity, &r.department));
        Ok(records)
    }

    /// Every record of one student, any status
    pub fn get_student_history(&self, ctx: &TxContext<'_>, student_id: &str) -> ContractResult<Vec<AcademicRecord>> {
        if !store::exists::<Student>(ctx, student_id)? {
            return Err(ContractError::not_found("student", student_id));
        }
        let identity = ctx.client_identity();
        let mut records: Vec<AcademicRecord> = store::scan(ctx, schema::RECORD_BY_STUDENT, &[student_id])?;
        records.retain(|r| self.access.can_view_department(identity, &r.department));
        Ok(records)
    }

    pub fn query_records_by_semester(
        &self,
        ctx: &TxContext<'_>,
        semester: u8,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<AcademicRecord>> {
        validation::validate_semester(semester)?;
        let semester = semester.to_string();
        self.record_page(ctx, schema::RECORD_BY_SEMESTER, &[&semester], page_size, bookmark)
    }

    pub fn query_records_by_status(
        &self,
        ctx: &TxContext<'_>,
        status: &str,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<AcademicRecord>> {
        let status: RecordStatus = parse_enum("record status", status)?;
        let status = status.to_string();
        self.record_page(ctx, schema::RECORD_BY_STATUS, &[&status], page_size, bookmark)
    }

    /// Records still in flight, in workflow order
    pub fn query_pending_records(&self, ctx: &TxContext<'_>) -> ContractResult<Vec<AcademicRecord>> {
        let identity = ctx.client_identity();
        let mut pending = Vec::new();
        for status in RecordStatus::iter().filter(|s| !s.is_terminal()) {
            let status = status.to_string();
            let records: Vec<AcademicRecord> = store::scan(ctx, schema::RECORD_BY_STATUS, &[&status])?;
            pending.extend(
                records
                    .into_iter()
                    .filter(|r| self.access.can_view_department(identity, &r.department)),
            );
        }
        Ok(pending)
    }

    fn record_page(
        &self,
        ctx: &TxContext<'_>,
        namespace: &'static str,
        prefix: &[&str],
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<AcademicRecord>> {
        let identity = ctx.client_identity();
        let page: PaginatedQueryResult<AcademicRecord> =
            store::scan_page(ctx, namespace, prefix, self.config.page_size(page_size), bookmark)?;
        Ok(page.retain(|r| self.access.can_view_department(identity, &r.department)))
    }

    /// Replace the courses of a rejected draft
    pub fn revise_academic_record(
        &self,
        ctx: &mut TxContext<'_>,
        record_id: &str,
        courses: Vec<CourseInput>,
    ) -> ContractResult<AcademicRecord> {
        let old: AcademicRecord = store::require(ctx, record_id)?;
        self.access.require_department(ctx.client_identity(), &old.department)?;

        if old.status != RecordStatus::Draft || old.rejection_note.is_none() {
            return Err(ContractError::Conflict(format!(
                "record {} can only be revised as a rejected draft",
                record_id
            )));
        }
        let courses = build_courses(courses)?;

        let mut record = old.clone();
        record.set_courses(courses);
        record.modified_at = ctx.tx_timestamp();

        store::replace(ctx, &old, &record)?;
        events::emit(
            ctx,
            EventKind::RecordRevised,
            &json!({
                "recordId": record_id,
                "oldSgpa": old.sgpa,
                "newSgpa": record.sgpa,
                "totalCredits": record.total_credits,
            }),
        )?;

        tracing::info!(record_id = %record_id, sgpa = %record.sgpa, "academic record revised");
        Ok(record)
    }

    /// Remove a draft that never entered the workflow
    pub fn delete_draft_record(&self, ctx: &mut TxContext<'_>, record_id: &str) -> ContractResult<()> {
        let record: AcademicRecord = store::require(ctx, record_id)?;
        self.access.require_department(ctx.client_identity(), &record.department)?;

        if record.status != RecordStatus::Draft {
            return Err(ContractError::Conflict(format!(
                "record {} is {} and cannot be deleted",
                record_id, record.status
            )));
        }
        // The approval record holds the permanent rejection log
        if store::exists::<ApprovalRecord>(ctx, record_id)? {
            return Err(ContractError::Conflict(format!(
                "record {} has approval history and cannot be deleted",
                record_id
            )));
        }

        store::remove(ctx, &record)?;
        events::emit(
            ctx,
            EventKind::RecordDeleted,
            &json!({ "recordId": record_id, "studentId": record.student_id }),
        )?;

        tracing::info!(record_id = %record_id, "draft record deleted");
        Ok(())
    }
}
