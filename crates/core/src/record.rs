//! Academic records - one student's graded courses for one semester

use crate::grade::{CourseEntry, SemesterSummary};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Workflow status of an academic record
///
/// The multi-party chain runs `Draft` through `Finalized`; the direct
/// administrative path ends in `Approved`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Draft,
    Submitted,
    FacultyApproved,
    #[serde(rename = "HOD_APPROVED")]
    #[strum(serialize = "HOD_APPROVED")]
    HodApproved,
    ExamLocked,
    DeanApproved,
    Finalized,
    Approved,
}

impl RecordStatus {
    /// Terminal statuses accept no further transitions, rejection included
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecordStatus::Finalized | RecordStatus::Approved)
    }

    /// Statuses whose grades count toward cumulative standing
    pub fn counts_toward_cgpa(&self) -> bool {
        self.is_terminal()
    }
}

/// Grades of one student for one semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicRecord {
    pub record_id: String,
    pub student_id: String,
    pub department: String,
    pub semester: u8,
    pub academic_year: String,
    pub courses: Vec<CourseEntry>,
    pub total_credits: Decimal,
    pub sgpa: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<Decimal>,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_note: Option<String>,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    pub modified_at: DateTime<Utc>,
}

impl AcademicRecord {
    /// Replace the course list and recompute derived totals
    pub fn set_courses(&mut self, courses: Vec<CourseEntry>) {
        let summary = SemesterSummary::from_courses(&courses);
        self.courses = courses;
        self.total_credits = summary.total_credits;
        self.sgpa = summary.sgpa;
    }

    /// SGPA weighted by credits, the unit the cumulative average sums over.
    /// Summed from the courses so repeating SGPA decimals do not drift.
    pub fn weighted_points(&self) -> Decimal {
        self.courses
            .iter()
            .map(|c| c.grade.points() * c.credits.value())
            .sum()
    }
}
