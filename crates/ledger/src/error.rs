//! Ledger errors

use crate::hash::ChainError;
use thiserror::Error;

/// Errors that can occur in ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid composite key: {0}")]
    InvalidKey(String),

    #[error("Empty key is not allowed")]
    EmptyKey,

    #[error("Invalid bookmark: {0}")]
    InvalidBookmark(String),

    #[error("{open} range iterator(s) still open at end of transaction {tx_id}")]
    IteratorLeak { tx_id: String, open: usize },

    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    #[error("Block sink rejected block {number}: {reason}")]
    SinkFailed { number: u64, reason: String },

    #[error("Chain verification failed: {0}")]
    Chain(#[from] ChainError),
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
