//! Cumulative GPA over completed records
//!
//! The record being completed is counted exactly once through an explicit
//! term, before its own status changes. Completed records of the same
//! semester are left out of the historical sum.

use crate::error::ContractResult;
use crate::schema;
use crate::store;
use acad_core::{AcademicRecord, RecordStatus};
use acad_ledger::TxContext;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Credit total and cumulative GPA
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub cgpa: Decimal,
    pub total_credits: Decimal,
}

impl Standing {
    fn from_sums(points: Decimal, credits: Decimal) -> Self {
        let cgpa = if credits.is_zero() {
            Decimal::ZERO
        } else {
            (points / credits).normalize()
        };
        Self {
            cgpa,
            total_credits: credits,
        }
    }
}

/// Result of completing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    /// Cumulative GPA as of the record's semester
    pub as_of_semester: Standing,
    /// Student's overall standing across every completed semester
    pub overall: Standing,
}

/// Completed records of a student, in index order
pub fn completed_records(ctx: &TxContext<'_>, student_id: &str) -> ContractResult<Vec<AcademicRecord>> {
    let mut records = Vec::new();
    for status in RecordStatus::iter().filter(RecordStatus::counts_toward_cgpa) {
        let status = status.to_string();
        records.extend(store::scan::<AcademicRecord>(
            ctx,
            schema::RECORD_BY_STATUS,
            &[&status, student_id],
        )?);
    }
    Ok(records)
}

/// Aggregate standing including `current`, which is about to complete
pub fn aggregate(ctx: &TxContext<'_>, current: &AcademicRecord) -> ContractResult<Aggregate> {
    let history: Vec<AcademicRecord> = completed_records(ctx, &current.student_id)?
        .into_iter()
        .filter(|r| r.record_id != current.record_id && r.semester != current.semester)
        .collect();

    let (mut prior_points, mut prior_credits) = (Decimal::ZERO, Decimal::ZERO);
    let (mut all_points, mut all_credits) = (Decimal::ZERO, Decimal::ZERO);
    for record in &history {
        let points = record.weighted_points();
        if record.semester < current.semester {
            prior_points += points;
            prior_credits += record.total_credits;
        }
        all_points += points;
        all_credits += record.total_credits;
    }

    let points = current.weighted_points();
    let aggregate = Aggregate {
        as_of_semester: Standing::from_sums(prior_points + points, prior_credits + current.total_credits),
        overall: Standing::from_sums(all_points + points, all_credits + current.total_credits),
    };

    tracing::debug!(
        student = %current.student_id,
        semester = current.semester,
        history = history.len(),
        cgpa = %aggregate.overall.cgpa,
        "standing aggregated"
    );
    Ok(aggregate)
}
