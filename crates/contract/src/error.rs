//! Contract errors

use acad_approval::WorkflowError;
use acad_core::ValidationError;
use acad_ledger::LedgerError;
use thiserror::Error;

/// Error classes surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Authorization,
    Internal,
}

/// Errors from contract operations. Any error aborts the invocation's
/// entire write-set.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} {id} already exists")]
    AlreadyExists { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Unauthorized: expected {expected}, got {actual}")]
    Unauthorized { expected: String, actual: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Validation(_) => ErrorKind::Validation,
            ContractError::NotFound { .. } => ErrorKind::NotFound,
            ContractError::AlreadyExists { .. } | ContractError::Conflict(_) => ErrorKind::Conflict,
            ContractError::Workflow(WorkflowError::MissingReason) => ErrorKind::Validation,
            ContractError::Workflow(_) => ErrorKind::Conflict,
            ContractError::Unauthorized { .. } => ErrorKind::Authorization,
            ContractError::Ledger(_) | ContractError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ContractError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        ContractError::AlreadyExists {
            entity,
            id: id.into(),
        }
    }
}

/// Result type for contract operations
pub type ContractResult<T> = Result<T, ContractError>;
