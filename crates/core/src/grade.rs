//! Letter grades, course entries and semester grade-point arithmetic

use crate::credits::Credits;
use crate::error::ValidationError;
use crate::validation;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Letter grade awarded for one course
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    P,
    U,
    R,
}

impl Grade {
    /// Grade points on the 10-point scale
    pub fn points(&self) -> Decimal {
        let points = match self {
            Grade::S => 10,
            Grade::A => 9,
            Grade::B => 8,
            Grade::C => 7,
            Grade::D => 6,
            Grade::P => 5,
            Grade::U | Grade::R => 0,
        };
        Decimal::from(points)
    }

    /// Parse a caller-supplied grade code
    pub fn parse(code: &str) -> Result<Self, ValidationError> {
        code.trim()
            .parse()
            .map_err(|_| ValidationError::InvalidGrade(code.to_string()))
    }
}

/// One course inside an academic record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEntry {
    pub course_code: String,
    pub course_name: String,
    pub credits: Credits,
    pub grade: Grade,
    pub department: String,
}

impl CourseEntry {
    /// Build a validated course entry from raw caller input
    pub fn new(
        course_code: &str,
        course_name: &str,
        credits: Decimal,
        grade: &str,
        department: &str,
    ) -> Result<Self, ValidationError> {
        validation::validate_course_code(course_code)?;
        validation::validate_name("course name", course_name)?;
        Ok(Self {
            course_code: course_code.to_string(),
            course_name: course_name.to_string(),
            credits: Credits::new(credits)?,
            grade: Grade::parse(grade)?,
            department: department.trim().to_uppercase(),
        })
    }
}

/// Credit total and credit-weighted grade-point average of a course list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SemesterSummary {
    pub total_credits: Decimal,
    pub sgpa: Decimal,
}

impl SemesterSummary {
    /// Aggregate a course list. An empty list yields zero credits and zero SGPA.
    pub fn from_courses(courses: &[CourseEntry]) -> Self {
        let (total_credits, total_points) =
            courses
                .iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(credits, points), course| {
                    let c = course.credits.value();
                    (credits + c, points + course.grade.points() * c)
                });

        let sgpa = if total_credits.is_zero() {
            Decimal::ZERO
        } else {
            (total_points / total_credits).normalize()
        };

        Self {
            total_credits,
            sgpa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn course(code: &str, credits: Decimal, grade: &str) -> CourseEntry {
        CourseEntry::new(code, "Some Course", credits, grade, "cse").unwrap()
    }

    #[test]
    fn test_grade_points() {
        assert_eq!(Grade::S.points(), dec!(10));
        assert_eq!(Grade::A.points(), dec!(9));
        assert_eq!(Grade::P.points(), dec!(5));
        assert_eq!(Grade::U.points(), dec!(0));
        assert_eq!(Grade::R.points(), dec!(0));
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!(Grade::parse("B").unwrap(), Grade::B);
        assert_eq!(Grade::parse("X"), Err(ValidationError::InvalidGrade("X".into())));
    }

    #[test]
    fn test_single_course_sgpa() {
        let summary = SemesterSummary::from_courses(&[course("CS101", dec!(4), "S")]);
        assert_eq!(summary.total_credits, dec!(4));
        assert_eq!(summary.sgpa, dec!(10));
    }

    #[test]
    fn test_weighted_average() {
        let courses = vec![
            course("CS101", dec!(4), "S"),
            course("CS102", dec!(3), "B"),
            course("CS103", dec!(1), "U"),
        ];
        let summary = SemesterSummary::from_courses(&courses);
        assert_eq!(summary.total_credits, dec!(8));
        // (40 + 24 + 0) / 8
        assert_eq!(summary.sgpa, dec!(8));
    }

    #[test]
    fn test_empty_course_list() {
        let summary = SemesterSummary::from_courses(&[]);
        assert_eq!(summary.total_credits, Decimal::ZERO);
        assert_eq!(summary.sgpa, Decimal::ZERO);
    }

    #[test]
    fn test_course_entry_validation() {
        assert!(CourseEntry::new("CS", "Algorithms", dec!(4), "A", "CSE").is_err());
        assert!(CourseEntry::new("CS201", "Al", dec!(4), "A", "CSE").is_err());
        assert!(CourseEntry::new("CS201", "Algorithms", dec!(0.25), "A", "CSE").is_err());
        assert!(CourseEntry::new("CS201", "Algorithms", dec!(4), "Z", "CSE").is_err());

        let entry = CourseEntry::new("CS201", "Algorithms", dec!(4), "A", "cse").unwrap();
        assert_eq!(entry.department, "CSE");
    }
}
