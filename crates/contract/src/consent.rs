//! Consent ledger
//!
//! At most one ACTIVE consent exists per (student, requester) pair. The
//! check runs at grant time over every entry of the pair, so revoked
//! entries stay behind as history.

use crate::access::Organization;
use crate::aggregation;
use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store;
use crate::AcademicContract;
use acad_core::validation;
use acad_core::{AcademicRecord, ConsentRecord, ConsentScope, ConsentStatus, Student};
use acad_ledger::TxContext;
use serde_json::json;

impl AcademicContract {
    pub fn grant_consent(
        &self,
        ctx: &mut TxContext<'_>,
        consent_id: &str,
        student_id: &str,
        requester_id: &str,
        scope: ConsentScope,
    ) -> ContractResult<ConsentRecord> {
        self.access.require_consent_authority(ctx.client_identity(), student_id)?;

        validation::validate_identifier("consent id", consent_id)?;
        validation::validate_identifier("requester", requester_id)?;
        if let ConsentScope::Semester { semester } = scope {
            validation::validate_semester(semester)?;
        }

        if !store::exists::<Student>(ctx, student_id)? {
            return Err(ContractError::not_found("student", student_id));
        }
        if store::exists::<ConsentRecord>(ctx, consent_id)? {
            return Err(ContractError::already_exists("consent", consent_id));
        }
        if self.active_consent(ctx, student_id, requester_id)?.is_some() {
            return Err(ContractError::Conflict(format!(
                "active consent already exists for {} and {}",
                student_id, requester_id
            )));
        }

        let consent = ConsentRecord {
            consent_id: consent_id.to_string(),
            student_id: student_id.to_string(),
            requester_id: requester_id.to_string(),
            scope,
            status: ConsentStatus::Active,
            granted_by: ctx.client_identity().id.clone(),
            granted_at: ctx.tx_timestamp(),
            revoked_by: None,
            revoked_at: None,
        };

        store::insert(ctx, &consent)?;
        events::emit(
            ctx,
            EventKind::ConsentGranted,
            &json!({
                "consentId": consent_id,
                "studentId": student_id,
                "requesterId": requester_id,
                "scope": scope,
            }),
        )?;

        tracing::info!(consent_id = %consent_id, student = %student_id, requester = %requester_id, "consent granted");
        Ok(consent)
    }

    pub fn revoke_consent(&self, ctx: &mut TxContext<'_>, consent_id: &str) -> ContractResult<ConsentRecord> {
        let old: ConsentRecord = store::require(ctx, consent_id)?;
        self.access
            .require_consent_authority(ctx.client_identity(), &old.student_id)?;

        if !old.is_active() {
            return Err(ContractError::Conflict(format!(
                "consent {} is already revoked",
                consent_id
            )));
        }

        let mut consent = old.clone();
        consent.status = ConsentStatus::Revoked;
        consent.revoked_by = Some(ctx.client_identity().id.clone());
        consent.revoked_at = Some(ctx.tx_timestamp());

        store::replace(ctx, &old, &consent)?;
        events::emit(
            ctx,
            EventKind::ConsentRevoked,
            &json!({
                "consentId": consent_id,
                "studentId": consent.student_id,
                "requesterId": consent.requester_id,
            }),
        )?;

        tracing::info!(consent_id = %consent_id, "consent revoked");
        Ok(consent)
    }

    /// Whether any consent of the pair is ACTIVE
    pub fn check_consent(&self, ctx: &TxContext<'_>, student_id: &str, requester_id: &str) -> ContractResult<bool> {
        Ok(self.active_consent(ctx, student_id, requester_id)?.is_some())
    }

    /// Every consent of a student, revoked ones included
    pub fn get_consents_by_student(&self, ctx: &TxContext<'_>, student_id: &str) -> ContractResult<Vec<ConsentRecord>> {
        store::scan(ctx, schema::CONSENT_BY_PAIR, &[student_id])
    }

    /// Completed records a verifier may see under its active consent
    pub fn view_records_with_consent(&self, ctx: &TxContext<'_>, student_id: &str) -> ContractResult<Vec<AcademicRecord>> {
        let identity = ctx.client_identity();
        self.access.require_org(identity, &[Organization::Verifier])?;

        let consent = self
            .active_consent(ctx, student_id, &identity.id)?
            .ok_or_else(|| ContractError::Unauthorized {
                expected: format!("active consent from {}", student_id),
                actual: format!("no active consent for {}", identity.id),
            })?;

        let mut records = aggregation::completed_records(ctx, student_id)?;
        records.retain(|r| consent.scope.covers(r.semester));
        records.sort_by_key(|r| r.semester);

        tracing::info!(student = %student_id, requester = %identity.id, records = records.len(), "records viewed under consent");
        Ok(records)
    }

    fn active_consent(
        &self,
        ctx: &TxContext<'_>,
        student_id: &str,
        requester_id: &str,
    ) -> ContractResult<Option<ConsentRecord>> {
        let consents: Vec<ConsentRecord> = store::scan(ctx, schema::CONSENT_BY_PAIR, &[student_id, requester_id])?;
        Ok(consents.into_iter().find(ConsentRecord::is_active))
    }
}
