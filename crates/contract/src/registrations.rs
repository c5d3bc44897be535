//! Semester registrations

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store;
use crate::AcademicContract;
use acad_core::validation::{self, parse_enum};
use acad_core::{RegistrationStatus, SemesterRegistration, Student};
use acad_ledger::TxContext;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistration {
    pub registration_id: String,
    pub student_id: String,
    pub semester: u8,
    pub academic_year: String,
    pub faculty_advisor: String,
}

impl AcademicContract {
    pub fn register_for_semester(
        &self,
        ctx: &mut TxContext<'_>,
        input: NewRegistration,
    ) -> ContractResult<SemesterRegistration> {
        validation::validate_identifier("registration id", &input.registration_id)?;
        validation::validate_semester(input.semester)?;
        validation::validate_identifier("academic year", &input.academic_year)?;

        let student: Student = store::require(ctx, &input.student_id)?;
        self.access.require_department(ctx.client_identity(), &student.department)?;

        if store::exists::<SemesterRegistration>(ctx, &input.registration_id)? {
            return Err(ContractError::already_exists(
                "semester registration",
                &input.registration_id,
            ));
        }

        let now = ctx.tx_timestamp();
        let registration = SemesterRegistration {
            registration_id: input.registration_id,
            student_id: student.roll_number,
            semester: input.semester,
            academic_year: input.academic_year,
            faculty_advisor: input.faculty_advisor,
            status: RegistrationStatus::Registered,
            registered_by: ctx.client_identity().id.clone(),
            registered_at: now,
            modified_at: now,
        };

        store::insert(ctx, &registration)?;
        events::emit(
            ctx,
            EventKind::StudentRegisteredForSemester,
            &json!({
                "registrationId": registration.registration_id,
                "studentId": registration.student_id,
                "semester": registration.semester,
                "academicYear": registration.academic_year,
            }),
        )?;

        tracing::info!(
            registration_id = %registration.registration_id,
            student = %registration.student_id,
            semester = registration.semester,
            "student registered for semester"
        );
        Ok(registration)
    }

    pub fn get_semester_registration(
        &self,
        ctx: &TxContext<'_>,
        registration_id: &str,
    ) -> ContractResult<SemesterRegistration> {
        store::require(ctx, registration_id)
    }

    /// Registrations of one student, ordered by semester
    pub fn get_semester_registrations_by_student(
        &self,
        ctx: &TxContext<'_>,
        student_id: &str,
    ) -> ContractResult<Vec<SemesterRegistration>> {
        store::scan(ctx, schema::REGISTRATION_BY_STUDENT, &[student_id])
    }

    pub fn update_registration_status(
        &self,
        ctx: &mut TxContext<'_>,
        registration_id: &str,
        status: &str,
    ) -> ContractResult<SemesterRegistration> {
        let next: RegistrationStatus = parse_enum("registration status", status)?;

        let old: SemesterRegistration = store::require(ctx, registration_id)?;
        let student: Student = store::require(ctx, &old.student_id)?;
        self.access.require_department(ctx.client_identity(), &student.department)?;

        if !old.status.can_transition_to(next) {
            return Err(ContractError::Conflict(format!(
                "registration {} cannot move from {} to {}",
                registration_id, old.status, next
            )));
        }

        let mut registration = old.clone();
        registration.status = next;
        registration.modified_at = ctx.tx_timestamp();

        store::replace(ctx, &old, &registration)?;
        events::emit(
            ctx,
            EventKind::RegistrationStatusUpdated,
            &json!({
                "registrationId": registration_id,
                "oldStatus": old.status,
                "newStatus": next,
            }),
        )?;
        Ok(registration)
    }
}
