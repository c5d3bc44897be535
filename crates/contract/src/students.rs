//! Student operations

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store::{self, PaginatedQueryResult};
use crate::AcademicContract;
use acad_core::validation::{self, parse_enum};
use acad_core::{Student, StudentPrivateDetails, StudentStatus, ValidationError};
use acad_ledger::{sha256_hex, TxContext};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Transient key carrying the raw national identity number
pub const TRANSIENT_NATIONAL_ID: &str = "nationalId";
pub const TRANSIENT_PHONE: &str = "phone";
pub const TRANSIENT_PERSONAL_EMAIL: &str = "personalEmail";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub roll_number: String,
    pub name: String,
    pub department: String,
    pub enrollment_year: i32,
    pub email: String,
    pub admission_category: String,
}

/// Contact fields supplied through transient input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    pub phone: Option<String>,
    pub personal_email: Option<String>,
}

impl ContactUpdate {
    fn from_transient(ctx: &TxContext<'_>) -> Self {
        Self {
            phone: transient_string(ctx, TRANSIENT_PHONE),
            personal_email: transient_string(ctx, TRANSIENT_PERSONAL_EMAIL),
        }
    }

    fn is_empty(&self) -> bool {
        self.phone.is_none() && self.personal_email.is_none()
    }

    /// Names of the fields present, for event payloads
    fn field_names(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.phone.is_some() {
            fields.push(TRANSIENT_PHONE);
        }
        if self.personal_email.is_some() {
            fields.push(TRANSIENT_PERSONAL_EMAIL);
        }
        fields
    }

    fn apply(self, details: &mut StudentPrivateDetails) {
        if let Some(phone) = self.phone {
            details.phone = Some(phone);
        }
        if let Some(email) = self.personal_email {
            details.personal_email = Some(email);
        }
    }
}

fn transient_string(ctx: &TxContext<'_>, key: &str) -> Option<String> {
    ctx.transient(key)
        .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
        .filter(|s| !s.is_empty())
}

impl AcademicContract {
    /// Register a student. Contact and identity details travel as transient
    /// input and land only in the private collection.
    pub fn create_student(&self, ctx: &mut TxContext<'_>, input: NewStudent) -> ContractResult<Student> {
        self.access.require_central(ctx.client_identity())?;

        validation::validate_roll_number(&input.roll_number)?;
        validation::validate_name("name", &input.name)?;
        validation::validate_email(&input.email, &self.config.student_email_domain)?;
        validation::validate_enrollment_year(input.enrollment_year, ctx.tx_timestamp().year())?;
        validation::require("admission category", &input.admission_category)?;
        let department = validation::normalize_department(&input.department)?;

        if store::exists::<Student>(ctx, &input.roll_number)? {
            return Err(ContractError::already_exists("student", &input.roll_number));
        }

        let actor = ctx.client_identity().id.clone();
        let now = ctx.tx_timestamp();
        let student = Student {
            roll_number: input.roll_number,
            name: input.name,
            department,
            enrollment_year: input.enrollment_year,
            email: input.email,
            admission_category: input.admission_category,
            status: StudentStatus::Active,
            status_reason: None,
            total_credits_earned: Decimal::ZERO,
            current_cgpa: Decimal::ZERO,
            created_by: actor.clone(),
            created_at: now,
            modified_by: actor,
            modified_at: now,
        };

        let contact = ContactUpdate::from_transient(ctx);
        let national_id_hash = transient_string(ctx, TRANSIENT_NATIONAL_ID).map(sha256_hex);
        if !contact.is_empty() || national_id_hash.is_some() {
            let mut details = StudentPrivateDetails {
                student_id: student.roll_number.clone(),
                national_id_hash,
                ..Default::default()
            };
            contact.apply(&mut details);
            ctx.put_private_data(
                &self.config.private_collection,
                &student.roll_number,
                serde_json::to_vec(&details)?,
            )?;
        }

        store::insert(ctx, &student)?;
        events::emit(
            ctx,
            EventKind::StudentCreated,
            &json!({
                "rollNumber": student.roll_number,
                "department": student.department,
                "enrollmentYear": student.enrollment_year,
            }),
        )?;

        tracing::info!(roll_number = %student.roll_number, department = %student.department, "student created");
        Ok(student)
    }

    pub fn get_student(&self, ctx: &TxContext<'_>, roll_number: &str) -> ContractResult<Student> {
        store::require(ctx, roll_number)
    }

    pub fn student_exists(&self, ctx: &TxContext<'_>, roll_number: &str) -> ContractResult<bool> {
        store::exists::<Student>(ctx, roll_number)
    }

    /// Private details; central organization only
    pub fn get_student_private_details(
        &self,
        ctx: &TxContext<'_>,
        roll_number: &str,
    ) -> ContractResult<StudentPrivateDetails> {
        self.access.require_central(ctx.client_identity())?;
        match ctx.get_private_data(&self.config.private_collection, roll_number)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Err(ContractError::not_found("private details", roll_number)),
        }
    }

    pub fn update_student_status(
        &self,
        ctx: &mut TxContext<'_>,
        roll_number: &str,
        status: &str,
        reason: Option<&str>,
    ) -> ContractResult<Student> {
        self.access.require_central(ctx.client_identity())?;
        let status: StudentStatus = parse_enum("student status", status)?;
        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if status.requires_reason() && reason.is_none() {
            return Err(ValidationError::Required { field: "reason" }.into());
        }

        let old: Student = store::require(ctx, roll_number)?;
        let mut student = old.clone();
        student.status = status;
        student.status_reason = reason.map(str::to_string);
        student.touch(&ctx.client_identity().id, ctx.tx_timestamp());

        store::replace(ctx, &old, &student)?;
        events::emit(
            ctx,
            EventKind::StudentStatusChanged,
            &json!({
                "rollNumber": roll_number,
                "oldStatus": old.status,
                "newStatus": status,
                "reason": student.status_reason,
            }),
        )?;

        tracing::info!(roll_number = %roll_number, from = %old.status, to = %status, "student status changed");
        Ok(student)
    }

    pub fn update_student_department(
        &self,
        ctx: &mut TxContext<'_>,
        roll_number: &str,
        department: &str,
    ) -> ContractResult<Student> {
        self.access.require_central(ctx.client_identity())?;
        let department = validation::normalize_department(department)?;

        let old: Student = store::require(ctx, roll_number)?;
        if old.department == department {
            return Err(ContractError::Conflict(format!(
                "student {} is already in department {}",
                roll_number, department
            )));
        }

        let mut student = old.clone();
        student.department = department.clone();
        student.touch(&ctx.client_identity().id, ctx.tx_timestamp());

        store::replace(ctx, &old, &student)?;
        events::emit(
            ctx,
            EventKind::StudentDepartmentChanged,
            &json!({
                "rollNumber": roll_number,
                "oldDepartment": old.department,
                "newDepartment": department,
            }),
        )?;

        tracing::info!(roll_number = %roll_number, from = %old.department, to = %department, "student department changed");
        Ok(student)
    }

    /// Update phone and/or personal email from transient input
    pub fn update_student_contact_info(&self, ctx: &mut TxContext<'_>, roll_number: &str) -> ContractResult<()> {
        self.access.require_central(ctx.client_identity())?;

        let update = ContactUpdate::from_transient(ctx);
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let old: Student = store::require(ctx, roll_number)?;
        let mut details = match ctx.get_private_data(&self.config.private_collection, roll_number)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => StudentPrivateDetails {
                student_id: roll_number.to_string(),
                ..Default::default()
            },
        };

        let fields = update.field_names();
        update.apply(&mut details);
        ctx.put_private_data(
            &self.config.private_collection,
            roll_number,
            serde_json::to_vec(&details)?,
        )?;

        let mut student = old.clone();
        student.touch(&ctx.client_identity().id, ctx.tx_timestamp());
        store::replace(ctx, &old, &student)?;

        events::emit(
            ctx,
            EventKind::StudentContactUpdated,
            &json!({ "rollNumber": roll_number, "fields": fields }),
        )?;
        Ok(())
    }

    /// Every student visible to the caller
    pub fn get_all_students(&self, ctx: &TxContext<'_>) -> ContractResult<Vec<Student>> {
        let identity = ctx.client_identity();
        let mut students: Vec<Student> = store::scan(ctx, schema::STUDENT_ALL, &[])?;
        students.retain(|s| self.access.can_view_department(identity, &s.department));
        Ok(students)
    }

    pub fn get_students_by_department(&self, ctx: &TxContext<'_>, department: &str) -> ContractResult<Vec<Student>> {
        let department = validation::normalize_department(department)?;
        let identity = ctx.client_identity();
        let mut students: Vec<Student> = store::scan(ctx, schema::STUDENT_BY_DEPARTMENT, &[&department])?;
        students.retain(|s| self.access.can_view_department(identity, &s.department));
        Ok(students)
    }

    pub fn query_students_by_department(
        &self,
        ctx: &TxContext<'_>,
        department: &str,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<Student>> {
        let department = validation::normalize_department(department)?;
        self.student_page(ctx, schema::STUDENT_BY_DEPARTMENT, &[&department], page_size, bookmark)
    }

    pub fn query_students_by_year(
        &self,
        ctx: &TxContext<'_>,
        enrollment_year: i32,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<Student>> {
        let year = enrollment_year.to_string();
        self.student_page(ctx, schema::STUDENT_BY_YEAR, &[&year], page_size, bookmark)
    }

    pub fn query_students_by_status(
        &self,
        ctx: &TxContext<'_>,
        status: &str,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<Student>> {
        let status: StudentStatus = parse_enum("student status", status)?;
        let status = status.to_string();
        self.student_page(ctx, schema::STUDENT_BY_STATUS, &[&status], page_size, bookmark)
    }

    fn student_page(
        &self,
        ctx: &TxContext<'_>,
        namespace: &'static str,
        prefix: &[&str],
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<Student>> {
        let identity = ctx.client_identity();
        let page: PaginatedQueryResult<Student> =
            store::scan_page(ctx, namespace, prefix, self.config.page_size(page_size), bookmark)?;
        Ok(page.retain(|s| self.access.can_view_department(identity, &s.department)))
    }

    /// Current cumulative GPA of a student
    pub fn get_student_cgpa(&self, ctx: &TxContext<'_>, roll_number: &str) -> ContractResult<Decimal> {
        let student: Student = store::require(ctx, roll_number)?;
        Ok(student.current_cgpa)
    }
}
