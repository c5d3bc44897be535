//! Input validation shared by entity constructors
//!
//! Every check returns `ValidationError` so callers can propagate with `?`.

use crate::error::ValidationError;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Earliest enrollment year accepted
pub const MIN_ENROLLMENT_YEAR: i32 = 1950;

/// Minimum total credits of one semester record
pub const MIN_SEMESTER_CREDITS: Decimal = Decimal::from_parts(16, 0, 0, false, 0);

/// Maximum total credits of one semester record
pub const MAX_SEMESTER_CREDITS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9._%+-]+)@([a-zA-Z0-9.-]+)$").expect("static email regex is valid")
});

/// Result type for validation checks
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// Check that `email` is a mailbox under the institutional `domain`
pub fn validate_email(email: &str, domain: &str) -> ValidationResult {
    let matches_domain = EMAIL_REGEX
        .captures(email)
        .and_then(|caps| caps.get(2))
        .is_some_and(|host| host.as_str() == domain);

    if matches_domain {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
            domain: domain.to_string(),
        })
    }
}

/// Check a string's length in characters
pub fn validate_length(field: &'static str, value: &str, min: usize, max: usize) -> ValidationResult {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// Check that a field is present and not blank
pub fn require(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

/// Reject control characters, which include the store's key delimiter
pub fn validate_key_component(field: &'static str, value: &str) -> ValidationResult {
    if value.chars().any(char::is_control) {
        return Err(ValidationError::ControlCharacter { field });
    }
    Ok(())
}

/// A caller-supplied id: present, and usable as a key component
pub fn validate_identifier(field: &'static str, value: &str) -> ValidationResult {
    require(field, value)?;
    validate_key_component(field, value)
}

/// Roll numbers are 5-20 characters
pub fn validate_roll_number(roll_number: &str) -> ValidationResult {
    validate_key_component("roll number", roll_number)?;
    validate_length("roll number", roll_number, 5, 20)
}

/// Person and course names are 3-100 characters
pub fn validate_name(field: &'static str, name: &str) -> ValidationResult {
    validate_length(field, name, 3, 100)
}

/// Course codes are 3-20 characters
pub fn validate_course_code(code: &str) -> ValidationResult {
    validate_key_component("course code", code)?;
    validate_length("course code", code, 3, 20)
}

/// Semesters are numbered 1 through 8
pub fn validate_semester(semester: u8) -> ValidationResult {
    if !(1..=8).contains(&semester) {
        return Err(ValidationError::SemesterOutOfRange(semester));
    }
    Ok(())
}

/// Total credits of a semester record must lie in [16, 30]
pub fn validate_semester_credits(total: Decimal) -> ValidationResult {
    if total < MIN_SEMESTER_CREDITS || total > MAX_SEMESTER_CREDITS {
        return Err(ValidationError::TotalCreditsOutOfRange(total));
    }
    Ok(())
}

/// Enrollment year must lie in [1950, current_year + 1]
pub fn validate_enrollment_year(year: i32, current_year: i32) -> ValidationResult {
    let max = current_year + 1;
    if year < MIN_ENROLLMENT_YEAR || year > max {
        return Err(ValidationError::EnrollmentYear {
            min: MIN_ENROLLMENT_YEAR,
            max,
            actual: year,
        });
    }
    Ok(())
}

/// SHA-256 content hashes are 64 hex characters; returns the lower-cased form
pub fn normalize_content_hash(hash: &str) -> ValidationResult<String> {
    let trimmed = hash.trim();
    if trimmed.len() != 64 || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidHash(hash.to_string()));
    }
    Ok(trimmed.to_ascii_lowercase())
}

/// Parse a SCREAMING_SNAKE_CASE enum value supplied by a caller
pub fn parse_enum<T: FromStr>(kind: &'static str, value: &str) -> ValidationResult<T> {
    T::from_str(value.trim()).map_err(|_| ValidationError::InvalidEnum {
        kind,
        value: value.to_string(),
    })
}

/// Department codes are stored upper-cased
pub fn normalize_department(code: &str) -> ValidationResult<String> {
    validate_identifier("department", code)?;
    Ok(code.trim().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StudentStatus;
    use rust_decimal_macros::dec;

    const DOMAIN: &str = "student.nitw.ac.in";

    #[test]
    fn test_email_domain() {
        assert!(validate_email("ab21cs1001@student.nitw.ac.in", DOMAIN).is_ok());
        assert!(validate_email("first.last+x@student.nitw.ac.in", DOMAIN).is_ok());
        assert!(validate_email("ab@gmail.com", DOMAIN).is_err());
        assert!(validate_email("ab@nitw.ac.in", DOMAIN).is_err());
        assert!(validate_email("a b@student.nitw.ac.in", DOMAIN).is_err());
        assert!(validate_email("@student.nitw.ac.in", DOMAIN).is_err());
    }

    #[test]
    fn test_lengths() {
        assert!(validate_roll_number("21CS1").is_ok());
        assert!(validate_roll_number("21CS").is_err());
        assert!(validate_roll_number(&"9".repeat(21)).is_err());
        assert!(validate_name("name", "Ada").is_ok());
        assert!(validate_name("name", "Al").is_err());
        assert!(validate_course_code("CS101").is_ok());
        assert!(validate_course_code("CS").is_err());
    }

    #[test]
    fn test_identifiers_reject_control_characters() {
        assert!(validate_identifier("record id", "REC-2026-1").is_ok());
        assert_eq!(
            validate_identifier("record id", "REC\u{0}1"),
            Err(ValidationError::ControlCharacter { field: "record id" })
        );
        assert!(validate_identifier("record id", "REC\n1").is_err());
        assert_eq!(
            validate_identifier("record id", "  "),
            Err(ValidationError::Required { field: "record id" })
        );
        assert!(validate_roll_number("21CS\u{0}001").is_err());
        assert!(validate_course_code("CS\u{0}1").is_err());
        assert!(normalize_department("C\u{0}SE").is_err());
    }

    #[test]
    fn test_semester_bounds() {
        assert!(validate_semester(1).is_ok());
        assert!(validate_semester(8).is_ok());
        assert_eq!(
            validate_semester(0),
            Err(ValidationError::SemesterOutOfRange(0))
        );
        assert!(validate_semester(9).is_err());
    }

    #[test]
    fn test_semester_credit_bounds() {
        assert!(validate_semester_credits(dec!(16)).is_ok());
        assert!(validate_semester_credits(dec!(30)).is_ok());
        assert!(validate_semester_credits(dec!(15.5)).is_err());
        assert!(validate_semester_credits(dec!(30.5)).is_err());
    }

    #[test]
    fn test_enrollment_year() {
        assert!(validate_enrollment_year(1950, 2026).is_ok());
        assert!(validate_enrollment_year(2027, 2026).is_ok());
        assert!(validate_enrollment_year(2028, 2026).is_err());
        assert!(validate_enrollment_year(1949, 2026).is_err());
    }

    #[test]
    fn test_content_hash() {
        let upper = "AB".repeat(32);
        assert_eq!(normalize_content_hash(&upper).unwrap(), "ab".repeat(32));
        assert!(normalize_content_hash("abc").is_err());
        assert!(normalize_content_hash(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_parse_enum() {
        let status: StudentStatus = parse_enum("student status", "GRADUATED").unwrap();
        assert_eq!(status, StudentStatus::Graduated);

        let err = parse_enum::<StudentStatus>("student status", "EXPELLED").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEnum { .. }));
    }

    #[test]
    fn test_normalize_department() {
        assert_eq!(normalize_department(" cse ").unwrap(), "CSE");
        assert!(normalize_department("  ").is_err());
    }
}
