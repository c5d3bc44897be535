//! Lifecycle notifications emitted on commit
//!
//! Workflow stage events take their names from `WorkflowAction::event_name`.

use crate::error::ContractResult;
use acad_ledger::TxContext;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    LedgerInitialized,
    StudentCreated,
    StudentStatusChanged,
    StudentDepartmentChanged,
    StudentContactUpdated,
    DepartmentCreated,
    DepartmentUpdated,
    CourseOfferingCreated,
    CourseOfferingUpdated,
    RecordCreated,
    RecordRevised,
    RecordDeleted,
    RecordRejected,
    CertificateIssued,
    CertificateRevoked,
    DocumentUploaded,
    DocumentStatusUpdated,
    StudentRegisteredForSemester,
    RegistrationStatusUpdated,
    ConsentGranted,
    ConsentRevoked,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::LedgerInitialized => "LedgerInitialized",
            EventKind::StudentCreated => "StudentCreated",
            EventKind::StudentStatusChanged => "StudentStatusChanged",
            EventKind::StudentDepartmentChanged => "StudentDepartmentChanged",
            EventKind::StudentContactUpdated => "StudentContactUpdated",
            EventKind::DepartmentCreated => "DepartmentCreated",
            EventKind::DepartmentUpdated => "DepartmentUpdated",
            EventKind::CourseOfferingCreated => "CourseOfferingCreated",
            EventKind::CourseOfferingUpdated => "CourseOfferingUpdated",
            EventKind::RecordCreated => "RecordCreated",
            EventKind::RecordRevised => "RecordRevised",
            EventKind::RecordDeleted => "RecordDeleted",
            EventKind::RecordRejected => "RecordRejected",
            EventKind::CertificateIssued => "CertificateIssued",
            EventKind::CertificateRevoked => "CertificateRevoked",
            EventKind::DocumentUploaded => "DocumentUploaded",
            EventKind::DocumentStatusUpdated => "DocumentStatusUpdated",
            EventKind::StudentRegisteredForSemester => "StudentRegisteredForSemester",
            EventKind::RegistrationStatusUpdated => "RegistrationStatusUpdated",
            EventKind::ConsentGranted => "ConsentGranted",
            EventKind::ConsentRevoked => "ConsentRevoked",
        }
    }
}

/// Emit `kind` with a structured payload
pub(crate) fn emit<T: Serialize>(ctx: &mut TxContext<'_>, kind: EventKind, payload: &T) -> ContractResult<()> {
    ctx.set_event(kind.as_str(), payload)?;
    Ok(())
}
