//! Certificates issued to students
//!
//! Validity is never stored. It is derived from the revocation flag and the
//! optional expiry each time it is asked for.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Kind of certificate
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
pub enum CertificateType {
    Degree,
    Transcript,
    Provisional,
    Bonafide,
    Migration,
    Character,
    StudyConduct,
}

impl CertificateType {
    /// Degree-class certificates carry the awarded degree and final CGPA
    pub fn is_degree_class(&self) -> bool {
        matches!(self, CertificateType::Degree | CertificateType::Provisional)
    }

    /// Bonafide certificates always expire a fixed period after issue
    pub fn has_fixed_validity(&self) -> bool {
        matches!(self, CertificateType::Bonafide)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate_id: String,
    pub student_id: String,
    pub certificate_type: CertificateType,
    pub issue_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Hex SHA-256 of the issued document payload
    pub document_hash: String,
    /// Content-addressed reference to the stored document
    pub external_ref: String,
    pub issued_by: String,
    pub revoked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revocation_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree_awarded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cgpa: Option<Decimal>,
}

impl Certificate {
    /// Not revoked and not past its expiry at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expiry_date.is_none_or(|expiry| now < expiry)
    }
}
