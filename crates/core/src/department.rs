//! Departments and the courses they offer each semester

use crate::credits::Credits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Academic department, keyed by upper-case code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_id: String,
    pub department_name: String,
    pub hod: String,
    pub email: String,
    pub phone: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: String,
    pub modified_at: DateTime<Utc>,
}

/// A course offered by a department in one semester of one academic year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    pub offering_id: String,
    pub department_id: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: Credits,
    pub semester: u8,
    pub academic_year: String,
    pub faculty: String,
    pub is_active: bool,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub modified_by: String,
    pub modified_at: DateTime<Utc>,
}

impl CourseOffering {
    /// Offering IDs join department, course code, semester and year with '-'
    pub fn offering_id(department: &str, course_code: &str, semester: u8, academic_year: &str) -> String {
        format!("{}-{}-{}-{}", department, course_code, semester, academic_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_id_format() {
        assert_eq!(
            CourseOffering::offering_id("CSE", "CS301", 5, "2025-26"),
            "CSE-CS301-5-2025-26"
        );
    }
}
