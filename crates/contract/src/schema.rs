//! Key namespaces and the index entries each entity implies

use crate::store::{Entity, IndexEntry};
use acad_approval::ApprovalRecord;
use acad_core::{
    AcademicRecord, Certificate, ConsentRecord, CourseOffering, Department, DocumentUpload,
    SemesterRegistration, Student,
};

// === Primary namespaces ===
pub const STUDENT: &str = "student";
pub const DEPARTMENT: &str = "department";
pub const COURSE_OFFERING: &str = "offering";
pub const ACADEMIC_RECORD: &str = "record";
pub const APPROVAL: &str = "approval";
pub const CERTIFICATE: &str = "certificate";
pub const DOCUMENT: &str = "document";
pub const SEMESTER_REGISTRATION: &str = "semreg";
pub const CONSENT: &str = "consent";

// === Secondary indexes ===
pub const STUDENT_ALL: &str = "student~all";
pub const STUDENT_BY_DEPARTMENT: &str = "student~dept";
pub const STUDENT_BY_YEAR: &str = "student~year";
pub const STUDENT_BY_STATUS: &str = "student~status";
pub const DEPARTMENT_ALL: &str = "department~all";
pub const OFFERING_BY_DEPARTMENT: &str = "course~dept";
pub const RECORD_BY_STUDENT: &str = "student~record";
pub const RECORD_BY_SEMESTER: &str = "record~semester";
pub const RECORD_BY_STATUS: &str = "record~status";
pub const RECORD_BY_DEPARTMENT: &str = "record~department";
pub const CERTIFICATE_BY_STUDENT: &str = "cert~student";
pub const CERTIFICATE_BY_TYPE: &str = "cert~type";
pub const DOCUMENT_BY_STUDENT: &str = "document~student";
pub const DOCUMENT_BY_STATUS: &str = "document~status";
pub const DOCUMENT_BY_HASH: &str = "document~hash";
pub const REGISTRATION_BY_STUDENT: &str = "semreg~student";
pub const CONSENT_BY_PAIR: &str = "consent~pair";

impl Entity for Student {
    const KIND: &'static str = "student";
    const NAMESPACE: &'static str = STUDENT;
    const INDEXES: &'static [&'static str] = &[
        STUDENT_ALL,
        STUDENT_BY_DEPARTMENT,
        STUDENT_BY_YEAR,
        STUDENT_BY_STATUS,
    ];

    fn id(&self) -> &str {
        &self.roll_number
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        let roll = self.roll_number.clone();
        vec![
            IndexEntry::new(STUDENT_ALL, vec![roll.clone()]),
            IndexEntry::new(STUDENT_BY_DEPARTMENT, vec![self.department.clone(), roll.clone()]),
            IndexEntry::new(STUDENT_BY_YEAR, vec![self.enrollment_year.to_string(), roll.clone()]),
            IndexEntry::new(STUDENT_BY_STATUS, vec![self.status.to_string(), roll]),
        ]
    }
}

impl Entity for Department {
    const KIND: &'static str = "department";
    const NAMESPACE: &'static str = DEPARTMENT;
    const INDEXES: &'static [&'static str] = &[DEPARTMENT_ALL];

    fn id(&self) -> &str {
        &self.department_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(DEPARTMENT_ALL, vec![self.department_id.clone()])]
    }
}

impl Entity for CourseOffering {
    const KIND: &'static str = "course offering";
    const NAMESPACE: &'static str = COURSE_OFFERING;
    const INDEXES: &'static [&'static str] = &[OFFERING_BY_DEPARTMENT];

    fn id(&self) -> &str {
        &self.offering_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            OFFERING_BY_DEPARTMENT,
            vec![self.department_id.clone(), self.offering_id.clone()],
        )]
    }
}

impl Entity for AcademicRecord {
    const KIND: &'static str = "academic record";
    const NAMESPACE: &'static str = ACADEMIC_RECORD;
    const INDEXES: &'static [&'static str] = &[
        RECORD_BY_STUDENT,
        RECORD_BY_SEMESTER,
        RECORD_BY_STATUS,
        RECORD_BY_DEPARTMENT,
    ];

    fn id(&self) -> &str {
        &self.record_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        let student = self.student_id.clone();
        let record = self.record_id.clone();
        vec![
            IndexEntry::new(RECORD_BY_STUDENT, vec![student.clone(), record.clone()]),
            IndexEntry::new(
                RECORD_BY_SEMESTER,
                vec![self.semester.to_string(), student.clone(), record.clone()],
            ),
            IndexEntry::new(
                RECORD_BY_STATUS,
                vec![self.status.to_string(), student.clone(), record.clone()],
            ),
            IndexEntry::new(
                RECORD_BY_DEPARTMENT,
                vec![self.department.clone(), student, record],
            ),
        ]
    }
}

impl Entity for ApprovalRecord {
    const KIND: &'static str = "approval record";
    const NAMESPACE: &'static str = APPROVAL;
    const INDEXES: &'static [&'static str] = &[];

    fn id(&self) -> &str {
        &self.record_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        Vec::new()
    }
}

impl Entity for Certificate {
    const KIND: &'static str = "certificate";
    const NAMESPACE: &'static str = CERTIFICATE;
    const INDEXES: &'static [&'static str] = &[CERTIFICATE_BY_STUDENT, CERTIFICATE_BY_TYPE];

    fn id(&self) -> &str {
        &self.certificate_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![
            IndexEntry::new(
                CERTIFICATE_BY_STUDENT,
                vec![self.student_id.clone(), self.certificate_id.clone()],
            ),
            IndexEntry::new(
                CERTIFICATE_BY_TYPE,
                vec![self.certificate_type.to_string(), self.certificate_id.clone()],
            ),
        ]
    }
}

impl Entity for DocumentUpload {
    const KIND: &'static str = "document";
    const NAMESPACE: &'static str = DOCUMENT;
    const INDEXES: &'static [&'static str] =
        &[DOCUMENT_BY_STUDENT, DOCUMENT_BY_STATUS, DOCUMENT_BY_HASH];

    fn id(&self) -> &str {
        &self.document_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![
            IndexEntry::new(
                DOCUMENT_BY_STUDENT,
                vec![self.student_id.clone(), self.document_id.clone()],
            ),
            IndexEntry::new(
                DOCUMENT_BY_STATUS,
                vec![self.status.to_string(), self.document_id.clone()],
            ),
            IndexEntry::unique(DOCUMENT_BY_HASH, vec![self.document_hash.clone()]),
        ]
    }
}

impl Entity for SemesterRegistration {
    const KIND: &'static str = "semester registration";
    const NAMESPACE: &'static str = SEMESTER_REGISTRATION;
    const INDEXES: &'static [&'static str] = &[REGISTRATION_BY_STUDENT];

    fn id(&self) -> &str {
        &self.registration_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            REGISTRATION_BY_STUDENT,
            vec![
                self.student_id.clone(),
                self.semester.to_string(),
                self.registration_id.clone(),
            ],
        )]
    }
}

impl Entity for ConsentRecord {
    const KIND: &'static str = "consent";
    const NAMESPACE: &'static str = CONSENT;
    const INDEXES: &'static [&'static str] = &[CONSENT_BY_PAIR];

    fn id(&self) -> &str {
        &self.consent_id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            CONSENT_BY_PAIR,
            vec![
                self.student_id.clone(),
                self.requester_id.clone(),
                self.consent_id.clone(),
            ],
        )]
    }
}
