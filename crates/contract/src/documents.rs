//! Document registry
//!
//! Content hashes are unique across the whole store. The hash index holds
//! the owning document id so lookups by hash need no scan.

use crate::error::{ContractError, ContractResult};
use crate::events::{self, EventKind};
use crate::schema;
use crate::store::{self, PaginatedQueryResult};
use crate::AcademicContract;
use acad_core::validation::{self, parse_enum};
use acad_core::{DocumentStatus, DocumentType, DocumentUpload, Student};
use acad_ledger::TxContext;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub document_id: String,
    pub student_id: String,
    pub document_type: String,
    pub document_hash: String,
    pub file_name: String,
    #[serde(default)]
    pub semester: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStatusUpdate {
    pub status: String,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl AcademicContract {
    pub fn upload_document(&self, ctx: &mut TxContext<'_>, input: NewDocument) -> ContractResult<DocumentUpload> {
        validation::validate_identifier("document id", &input.document_id)?;
        validation::require("file name", &input.file_name)?;
        let document_type: DocumentType = parse_enum("document type", &input.document_type)?;
        let document_hash = validation::normalize_content_hash(&input.document_hash)?;
        if let Some(semester) = input.semester {
            validation::validate_semester(semester)?;
        }

        let student: Student = store::require(ctx, &input.student_id)?;
        self.access.require_department(ctx.client_identity(), &student.department)?;

        if store::exists::<DocumentUpload>(ctx, &input.document_id)? {
            return Err(ContractError::already_exists("document", &input.document_id));
        }
        if let Some(owner) = store::unique_lookup(ctx, schema::DOCUMENT_BY_HASH, &[&document_hash])? {
            tracing::warn!(hash = %document_hash, owner = %owner, "duplicate document hash");
            return Err(ContractError::Conflict(format!(
                "document hash {} is already registered as {}",
                document_hash, owner
            )));
        }

        let actor = ctx.client_identity().id.clone();
        let now = ctx.tx_timestamp();
        let document = DocumentUpload {
            document_id: input.document_id,
            student_id: student.roll_number,
            document_type,
            document_hash,
            file_name: input.file_name,
            semester: input.semester,
            uploaded_by: actor.clone(),
            uploaded_at: now,
            is_verified: false,
            verified_by: None,
            verified_at: None,
            status: DocumentStatus::Uploaded,
            remarks: None,
            modified_by: actor,
            modified_at: now,
        };

        store::insert(ctx, &document)?;
        events::emit(
            ctx,
            EventKind::DocumentUploaded,
            &json!({
                "documentId": document.document_id,
                "studentId": document.student_id,
                "documentType": document.document_type,
                "documentHash": document.document_hash,
            }),
        )?;

        tracing::info!(document_id = %document.document_id, student = %document.student_id, "document uploaded");
        Ok(document)
    }

    pub fn get_document(&self, ctx: &TxContext<'_>, document_id: &str) -> ContractResult<DocumentUpload> {
        store::require(ctx, document_id)
    }

    /// Document registered under `document_hash`, if any
    pub fn verify_document_by_hash(
        &self,
        ctx: &TxContext<'_>,
        document_hash: &str,
    ) -> ContractResult<Option<DocumentUpload>> {
        let document_hash = validation::normalize_content_hash(document_hash)?;
        match store::unique_lookup(ctx, schema::DOCUMENT_BY_HASH, &[&document_hash])? {
            Some(id) => store::load(ctx, &id),
            None => Ok(None),
        }
    }

    pub fn get_documents_by_student(&self, ctx: &TxContext<'_>, student_id: &str) -> ContractResult<Vec<DocumentUpload>> {
        store::scan(ctx, schema::DOCUMENT_BY_STUDENT, &[student_id])
    }

    pub fn query_documents_by_status(
        &self,
        ctx: &TxContext<'_>,
        status: &str,
        page_size: usize,
        bookmark: &str,
    ) -> ContractResult<PaginatedQueryResult<DocumentUpload>> {
        let status: DocumentStatus = parse_enum("document status", status)?;
        store::scan_page(
            ctx,
            schema::DOCUMENT_BY_STATUS,
            &[&status.to_string()],
            self.config.page_size(page_size),
            bookmark,
        )
    }

    /// Advance the pipeline one stage, or reset it to UPLOADED
    pub fn update_document_status(
        &self,
        ctx: &mut TxContext<'_>,
        document_id: &str,
        update: DocumentStatusUpdate,
    ) -> ContractResult<DocumentUpload> {
        self.access.require_central(ctx.client_identity())?;
        let next: DocumentStatus = parse_enum("document status", &update.status)?;

        let old: DocumentUpload = store::require(ctx, document_id)?;
        if !old.status.can_transition_to(next) {
            return Err(ContractError::Conflict(format!(
                "document {} cannot move from {} to {}",
                document_id, old.status, next
            )));
        }

        let actor = ctx.client_identity().id.clone();
        let now = ctx.tx_timestamp();
        let mut document = old.clone();
        document.status = next;
        if next == DocumentStatus::Uploaded {
            document.is_verified = false;
            document.verified_by = None;
            document.verified_at = None;
        } else if next.is_authenticated() && !old.status.is_authenticated() {
            document.is_verified = true;
            document.verified_by = Some(actor.clone());
            document.verified_at = Some(now);
        }
        if let Some(remarks) = update.remarks {
            document.remarks = Some(remarks);
        }
        document.modified_by = actor;
        document.modified_at = now;

        store::replace(ctx, &old, &document)?;
        events::emit(
            ctx,
            EventKind::DocumentStatusUpdated,
            &json!({
                "documentId": document_id,
                "oldStatus": old.status,
                "newStatus": next,
                "isVerified": document.is_verified,
            }),
        )?;

        tracing::info!(document_id = %document_id, from = %old.status, to = %next, "document status updated");
        Ok(document)
    }
}
