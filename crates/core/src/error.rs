//! Validation errors for malformed or out-of-range input

use rust_decimal::Decimal;
use thiserror::Error;

/// Input rejected before any state is touched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format: {email} (must end with @{domain})")]
    InvalidEmail { email: String, domain: String },

    #[error("{field} must be between {min} and {max} characters, got {actual}")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} contains a control character")]
    ControlCharacter { field: &'static str },

    #[error("Invalid {kind}: {value}")]
    InvalidEnum { kind: &'static str, value: String },

    #[error("Invalid grade: {0}")]
    InvalidGrade(String),

    #[error("Course credits must be between 0.5 and 6, got {0}")]
    CreditsOutOfRange(Decimal),

    #[error("Total semester credits must be between 16 and 30, got {0}")]
    TotalCreditsOutOfRange(Decimal),

    #[error("Semester must be between 1 and 8, got {0}")]
    SemesterOutOfRange(u8),

    #[error("Enrollment year must be between {min} and {max}, got {actual}")]
    EnrollmentYear { min: i32, max: i32, actual: i32 },

    #[error("At least one course is required")]
    NoCourses,

    #[error("Invalid content hash: {0}")]
    InvalidHash(String),

    #[error("Reason must be at least {min} characters")]
    ReasonTooShort { min: usize },

    #[error("Expiry {expiry} must be after issue date {issued}")]
    ExpiryBeforeIssue { issued: String, expiry: String },

    #[error("Update contains no fields")]
    EmptyUpdate,
}
