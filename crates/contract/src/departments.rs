//! Departments and course offerings

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store;
use crate::AcademicContract;
use acad_core::validation;
use acad_core::{CourseOffering, Credits, Department, ValidationError};
use acad_ledger::TxContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDepartment {
    pub department_id: String,
    pub department_name: String,
    pub hod: String,
    pub email: String,
    pub phone: String,
}

/// Mutable department fields; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentUpdate {
    pub department_name: Option<String>,
    pub hod: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DepartmentUpdate {
    fn is_empty(&self) -> bool {
        self.department_name.is_none() && self.hod.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseOffering {
    pub department_id: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: Decimal,
    pub semester: u8,
    pub academic_year: String,
    pub faculty: String,
}

/// Mutable offering fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingUpdate {
    pub is_active: Option<bool>,
    pub faculty: Option<String>,
}

impl AcademicContract {
    pub fn create_department(&self, ctx: &mut TxContext<'_>, input: NewDepartment) -> ContractResult<Department> {
        self.access.require_central(ctx.client_identity())?;

        let code = validation::normalize_department(&input.department_id)?;
        validation::validate_name("department name", &input.department_name)?;
        if store::exists::<Department>(ctx, &code)? {
            return Err(ContractError::already_exists("department", code));
        }

        let actor = ctx.client_identity().id.clone();
        let now = ctx.tx_timestamp();
        let department = Department {
            department_id: code,
            department_name: input.department_name,
            hod: input.hod,
            email: input.email,
            phone: input.phone,
            created_by: actor.clone(),
            created_at: now,
            modified_by: actor,
            modified_at: now,
        };

        store::insert(ctx, &department)?;
        events::emit(
            ctx,
            EventKind::DepartmentCreated,
            &json!({ "departmentId": department.department_id, "name": department.department_name }),
        )?;

        tracing::info!(department = %department.department_id, "department created");
        Ok(department)
    }

    pub fn get_department(&self, ctx: &TxContext<'_>, department_id: &str) -> ContractResult<Department> {
        store::require(ctx, &validation::normalize_department(department_id)?)
    }

    pub fn get_all_departments(&self, ctx: &TxContext<'_>) -> ContractResult<Vec<Department>> {
        store::scan(ctx, schema::DEPARTMENT_ALL, &[])
    }

    pub fn update_department(
        &self,
        ctx: &mut TxContext<'_>,
        department_id: &str,
        update: DepartmentUpdate,
    ) -> ContractResult<Department> {
        self.access.require_central(ctx.client_identity())?;
        if update.is_empty() {
            return Err(ValidationError::EmptyUpdate.into());
        }
        if let Some(ref name) = update.department_name {
            validation::validate_name("department name", name)?;
        }

        let code = validation::normalize_department(department_id)?;
        let old: Department = store::require(ctx, &code)?;
        let mut department = old.clone();
        if let Some(name) = update.department_name {
            department.department_name = name;
        }
        if let Some(hod) = update.hod {
            department.hod = hod;
        }
        if let Some(email) = update.email {
            department.email = email;
        }
        if let Some(phone) = update.phone {
            department.phone = phone;
        }
        department.modified_by = ctx.client_identity().id.clone();
        department.modified_at = ctx.tx_timestamp();

        store::replace(ctx, &old, &department)?;
        events::emit(
            ctx,
            EventKind::DepartmentUpdated,
            &json!({ "departmentId": code, "hod": department.hod }),
        )?;
        Ok(department)
    }

    /// Offer a course; department staff only for their own department
    pub fn create_course_offering(
        &self,
        ctx: &mut TxContext<'_>,
        input: NewCourseOffering,
    ) -> ContractResult<CourseOffering> {
        let department = validation::normalize_department(&input.department_id)?;
        self.access.require_department(ctx.client_identity(), &department)?;

        validation::validate_course_code(&input.course_code)?;
        validation::validate_name("course name", &input.course_name)?;
        validation::validate_semester(input.semester)?;
        validation::validate_identifier("academic year", &input.academic_year)?;
        let credits = Credits::new(input.credits)?;

        let offering_id = CourseOffering::offering_id(
            &department,
            &input.course_code,
            input.semester,
            &input.academic_year,
        );
        if store::exists::<CourseOffering>(ctx, &offering_id)? {
            return Err(ContractError::already_exists("course offering", offering_id));
        }

        let actor = ctx.client_identity().id.clone();
        let now = ctx.tx_timestamp();
        let offering = CourseOffering {
            offering_id,
            department_id: department,
            course_code: input.course_code,
            course_name: input.course_name,
            credits,
            semester: input.semester,
            academic_year: input.academic_year,
            faculty: input.faculty,
            is_active: true,
            created_by: actor.clone(),
            created_at: now,
            modified_by: actor,
            modified_at: now,
        };

        store::insert(ctx, &offering)?;
        events::emit(
            ctx,
            EventKind::CourseOfferingCreated,
            &json!({
                "offeringId": offering.offering_id,
                "departmentId": offering.department_id,
                "semester": offering.semester,
            }),
        )?;

        tracing::info!(offering = %offering.offering_id, "course offering created");
        Ok(offering)
    }

    pub fn get_course_offering(&self, ctx: &TxContext<'_>, offering_id: &str) -> ContractResult<CourseOffering> {
        store::require(ctx, offering_id)
    }

    pub fn get_courses_by_department(
        &self,
        ctx: &TxContext<'_>,
        department_id: &str,
    ) -> ContractResult<Vec<CourseOffering>> {
        let department = validation::normalize_department(department_id)?;
        store::scan(ctx, schema::OFFERING_BY_DEPARTMENT, &[&department])
    }

    pub fn update_course_offering(
        &self,
        ctx: &mut TxContext<'_>,
        offering_id: &str,
        update: OfferingUpdate,
    ) -> ContractResult<CourseOffering> {
        if update.is_active.is_none() && update.faculty.is_none() {
            return Err(ValidationError::EmptyUpdate.into());
        }

        let old: CourseOffering = store::require(ctx, offering_id)?;
        self.access.require_department(ctx.client_identity(), &old.department_id)?;

        let mut offering = old.clone();
        if let Some(active) = update.is_active {
            offering.is_active = active;
        }
        if let Some(faculty) = update.faculty {
            offering.faculty = faculty;
        }
        offering.modified_by = ctx.client_identity().id.clone();
        offering.modified_at = ctx.tx_timestamp();

        store::replace(ctx, &old, &offering)?;
        events::emit(
            ctx,
            EventKind::CourseOfferingUpdated,
            &json!({ "offeringId": offering_id, "isActive": offering.is_active }),
        )?;
        Ok(offering)
    }
}
