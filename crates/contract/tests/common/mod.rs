//! Shared fixtures for contract integration tests
#![allow(dead_code)]

use acad_contract::{
    AcademicContract, ContractConfig, ContractResult, CourseInput, NewAcademicRecord, NewStudent,
};
use acad_core::{AcademicRecord, Student};
use acad_ledger::{ClientIdentity, Invocation, LedgerClock, MemoryLedger, TxContext};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

pub fn registrar() -> ClientIdentity {
    ClientIdentity::new("registrar", "NITWarangalMSP")
}

pub fn staff(department: &str, role: &str) -> ClientIdentity {
    ClientIdentity::new(format!("{}-{}", department.to_lowercase(), role), "DepartmentsMSP")
        .with_attribute("department", department)
        .with_attribute("role", role)
}

pub fn verifier(id: &str) -> ClientIdentity {
    ClientIdentity::new(id, "VerifiersMSP")
}

/// Contract plus an in-memory ledger on a fixed clock
pub struct Harness {
    pub ledger: MemoryLedger,
    pub contract: AcademicContract,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ContractConfig::default())
    }

    pub fn with_config(config: ContractConfig) -> Self {
        Self {
            ledger: MemoryLedger::new().with_clock(LedgerClock::Fixed(start_time())),
            contract: AcademicContract::new(config),
        }
    }

    pub fn submit<T>(
        &mut self,
        who: &ClientIdentity,
        f: impl FnOnce(&AcademicContract, &mut TxContext<'_>) -> ContractResult<T>,
    ) -> ContractResult<T> {
        self.submit_with(Invocation::new(who.clone()), f)
    }

    pub fn submit_with<T>(
        &mut self,
        invocation: Invocation,
        f: impl FnOnce(&AcademicContract, &mut TxContext<'_>) -> ContractResult<T>,
    ) -> ContractResult<T> {
        let contract = &self.contract;
        self.ledger.submit(invocation, |ctx| f(contract, ctx))
    }

    pub fn query<T>(
        &self,
        who: &ClientIdentity,
        f: impl FnOnce(&AcademicContract, &TxContext<'_>) -> ContractResult<T>,
    ) -> ContractResult<T> {
        let contract = &self.contract;
        self.ledger
            .evaluate(Invocation::new(who.clone()), |ctx| f(contract, ctx))
    }

    pub fn add_student(&mut self, roll: &str, department: &str) -> Student {
        let input = new_student(roll, department);
        self.submit(&registrar(), |c, ctx| c.create_student(ctx, input))
            .unwrap()
    }

    pub fn add_record(&mut self, record_id: &str, student: &str, semester: u8, grade: &str) -> AcademicRecord {
        let input = new_record(record_id, student, semester, "CSE", uniform_courses(grade));
        self.submit(&registrar(), |c, ctx| c.create_academic_record(ctx, input))
            .unwrap()
    }

    /// Walk a record through every multi-party stage
    pub fn finalize(&mut self, record_id: &str) -> ContractResult<AcademicRecord> {
        let department = self
            .query(&registrar(), |c, ctx| c.get_academic_record(ctx, record_id))?
            .department;

        self.submit(&staff(&department, "clerk"), |c, ctx| {
            c.submit_for_approval(ctx, record_id, "submitted")
        })?;
        self.submit(&staff(&department, "faculty"), |c, ctx| {
            c.faculty_approve(ctx, record_id, "grades checked")
        })?;
        self.submit(&staff(&department, "hod"), |c, ctx| {
            c.hod_approve(ctx, record_id, "approved")
        })?;
        self.submit(&registrar().with_attribute("role", "exam_section"), |c, ctx| {
            c.exam_section_lock(ctx, record_id, "locked")
        })?;
        self.submit(&registrar().with_attribute("role", "dean_academic"), |c, ctx| {
            c.dean_approve(ctx, record_id, "approved")
        })?;
        self.submit(&registrar().with_attribute("role", "dac_member"), |c, ctx| {
            c.finalize_record(ctx, record_id, "chairman", "final")
        })
    }

    pub fn student(&self, roll: &str) -> Student {
        self.query(&registrar(), |c, ctx| c.get_student(ctx, roll))
            .unwrap()
    }

    pub fn record(&self, record_id: &str) -> AcademicRecord {
        self.query(&registrar(), |c, ctx| c.get_academic_record(ctx, record_id))
            .unwrap()
    }
}

pub fn new_student(roll: &str, department: &str) -> NewStudent {
    NewStudent {
        roll_number: roll.to_string(),
        name: format!("Student {}", roll),
        department: department.to_string(),
        enrollment_year: 2024,
        email: format!("{}@student.nitw.ac.in", roll.to_lowercase()),
        admission_category: "GENERAL".to_string(),
    }
}

pub fn course(code: &str, credits: Decimal, grade: &str) -> CourseInput {
    CourseInput {
        course_code: code.to_string(),
        course_name: format!("Course {}", code),
        credits,
        grade: grade.to_string(),
        department: "CSE".to_string(),
    }
}

/// Five 4-credit courses with the same grade: 20 credits, SGPA = grade points
pub fn uniform_courses(grade: &str) -> Vec<CourseInput> {
    (1..=5)
        .map(|i| course(&format!("CS10{}", i), dec!(4), grade))
        .collect()
}

pub fn new_record(
    record_id: &str,
    student: &str,
    semester: u8,
    department: &str,
    courses: Vec<CourseInput>,
) -> NewAcademicRecord {
    NewAcademicRecord {
        record_id: record_id.to_string(),
        student_id: student.to_string(),
        semester,
        academic_year: "2025-26".to_string(),
        department: department.to_string(),
        courses,
    }
}
