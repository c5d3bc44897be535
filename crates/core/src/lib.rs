//! AcadChain Core - Domain types
//!
//! This crate contains the fundamental types shared by every AcadChain crate:
//! - `Student`, `Department`, `CourseOffering`: institutional master data
//! - `AcademicRecord` and `RecordStatus`: per-semester grade submissions
//! - `Grade` and `Credits`: grade points and validated credit values
//! - `Certificate`, `DocumentUpload`, `SemesterRegistration`, `ConsentRecord`
//! - `validation`: input checks shared by all entity constructors

pub mod certificate;
pub mod consent;
pub mod credits;
pub mod department;
pub mod document;
pub mod error;
pub mod grade;
pub mod record;
pub mod registration;
pub mod student;
pub mod validation;

pub use certificate::{Certificate, CertificateType};
pub use consent::{ConsentRecord, ConsentScope, ConsentStatus};
pub use credits::Credits;
pub use department::{CourseOffering, Department};
pub use document::{DocumentStatus, DocumentType, DocumentUpload};
pub use error::ValidationError;
pub use grade::{CourseEntry, Grade, SemesterSummary};
pub use record::{AcademicRecord, RecordStatus};
pub use registration::{RegistrationStatus, SemesterRegistration};
pub use student::{Student, StudentPrivateDetails, StudentStatus};
