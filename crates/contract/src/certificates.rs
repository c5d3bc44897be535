//! Certificate registry
//!
//! The payload itself never touches the ledger: only its SHA-256 digest is
//! stored. Validity is derived on every read from the revocation flag and
//! the expiry against the transaction clock.

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store;
use crate::AcademicContract;
use acad_core::validation::{self, parse_enum};
use acad_core::{Certificate, CertificateType, Student, ValidationError};
use acad_ledger::{sha256_hex, TxContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCertificate {
    pub certificate_id: String,
    pub student_id: String,
    pub certificate_type: String,
    /// Issued document content; hashed, never stored
    pub payload: String,
    /// Content-addressed location of the issued document
    pub external_ref: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// A certificate together with its validity at read time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    #[serde(flatten)]
    pub certificate: Certificate,
    pub is_valid: bool,
}

impl CertificateView {
    fn at(certificate: Certificate, now: DateTime<Utc>) -> Self {
        let is_valid = certificate.is_valid_at(now);
        Self {
            certificate,
            is_valid,
        }
    }
}

impl AcademicContract {
    pub fn issue_certificate(&self, ctx: &mut TxContext<'_>, input: NewCertificate) -> ContractResult<Certificate> {
        self.access.require_central(ctx.client_identity())?;

        validation::validate_identifier("certificate id", &input.certificate_id)?;
        validation::require("payload", &input.payload)?;
        validation::require("external reference", &input.external_ref)?;
        let certificate_type: CertificateType = parse_enum("certificate type", &input.certificate_type)?;

        if store::exists::<Certificate>(ctx, &input.certificate_id)? {
            return Err(ContractError::already_exists("certificate", &input.certificate_id));
        }
        let student: Student = store::require(ctx, &input.student_id)?;

        let now = ctx.tx_timestamp();
        let expiry_date = if certificate_type.has_fixed_validity() {
            now.checked_add_months(self.config.bonafide_validity())
        } else {
            input.expiry
        };
        if let Some(expiry) = expiry_date {
            if expiry <= now {
                return Err(ValidationError::ExpiryBeforeIssue {
                    issued: now.to_rfc3339(),
                    expiry: expiry.to_rfc3339(),
                }
                .into());
            }
        }

        let (degree_awarded, final_cgpa) = if certificate_type.is_degree_class() {
            (
                Some(format!("{} in {}", self.config.degree_program, student.department)),
                Some(student.current_cgpa),
            )
        } else {
            (None, None)
        };

        let certificate = Certificate {
            certificate_id: input.certificate_id,
            student_id: student.roll_number,
            certificate_type,
            issue_date: now,
            expiry_date,
            document_hash: sha256_hex(input.payload.as_bytes()),
            external_ref: input.external_ref,
            issued_by: ctx.client_identity().id.clone(),
            revoked: false,
            revocation_reason: None,
            revoked_by: None,
            revoked_at: None,
            degree_awarded,
            final_cgpa,
        };

        store::insert(ctx, &certificate)?;
        events::emit(
            ctx,
            EventKind::CertificateIssued,
            &json!({
                "certificateId": certificate.certificate_id,
                "studentId": certificate.student_id,
                "certificateType": certificate.certificate_type,
                "documentHash": certificate.document_hash,
            }),
        )?;

        tracing::info!(
            certificate_id = %certificate.certificate_id,
            student = %certificate.student_id,
            kind = %certificate.certificate_type,
            "certificate issued"
        );
        Ok(certificate)
    }

    pub fn get_certificate(&self, ctx: &TxContext<'_>, certificate_id: &str) -> ContractResult<CertificateView> {
        let certificate: Certificate = store::require(ctx, certificate_id)?;
        Ok(CertificateView::at(certificate, ctx.tx_timestamp()))
    }

    /// True when `payload` hashes to the stored digest and the certificate is valid now
    pub fn verify_certificate(&self, ctx: &TxContext<'_>, certificate_id: &str, payload: &str) -> ContractResult<bool> {
        let certificate: Certificate = store::require(ctx, certificate_id)?;
        let matches = sha256_hex(payload.as_bytes()) == certificate.document_hash;
        let valid = certificate.is_valid_at(ctx.tx_timestamp());

        tracing::debug!(certificate_id = %certificate_id, matches, valid, "certificate verified");
        Ok(matches && valid)
    }

    pub fn revoke_certificate(
        &self,
        ctx: &mut TxContext<'_>,
        certificate_id: &str,
        reason: &str,
    ) -> ContractResult<Certificate> {
        self.access.require_central(ctx.client_identity())?;

        let reason = reason.trim();
        if reason.chars().count() < self.config.min_revocation_reason_len {
            return Err(ValidationError::ReasonTooShort {
                min: self.config.min_revocation_reason_len,
            }
            .into());
        }

        let old: Certificate = store::require(ctx, certificate_id)?;
        if old.revoked {
            return Err(ContractError::Conflict(format!(
                "certificate {} is already revoked",
                certificate_id
            )));
        }

        let mut certificate = old.clone();
        certificate.revoked = true;
        certificate.revocation_reason = Some(reason.to_string());
        certificate.revoked_by = Some(ctx.client_identity().id.clone());
        certificate.revoked_at = Some(ctx.tx_timestamp());

        store::replace(ctx, &old, &certificate)?;
        events::emit(
            ctx,
            EventKind::CertificateRevoked,
            &json!({
                "certificateId": certificate_id,
                "studentId": certificate.student_id,
                "reason": reason,
            }),
        )?;

        tracing::info!(certificate_id = %certificate_id, "certificate revoked");
        Ok(certificate)
    }

    pub fn get_certificates_by_student(
        &self,
        ctx: &TxContext<'_>,
        student_id: &str,
    ) -> ContractResult<Vec<CertificateView>> {
        let now = ctx.tx_timestamp();
        let certificates: Vec<Certificate> = store::scan(ctx, schema::CERTIFICATE_BY_STUDENT, &[student_id])?;
        Ok(certificates
            .into_iter()
            .map(|c| CertificateView::at(c, now))
            .collect())
    }

    pub fn query_certificates_by_type(
        &self,
        ctx: &TxContext<'_>,
        certificate_type: &str,
    ) -> ContractResult<Vec<CertificateView>> {
        let certificate_type: CertificateType = parse_enum("certificate type", certificate_type)?;
        let now = ctx.tx_timestamp();
        let certificates: Vec<Certificate> = store::scan(
            ctx,
            schema::CERTIFICATE_BY_TYPE,
            &[&certificate_type.to_string()],
        )?;
        Ok(certificates
            .into_iter()
            .map(|c| CertificateView::at(c, now))
            .collect())
    }
}
