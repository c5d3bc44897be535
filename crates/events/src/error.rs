//! Block journal errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid journal file {file}: line {line}")]
    InvalidLine { file: String, line: usize },

    #[error("Out-of-order block: expected {expected}, got {actual}")]
    OutOfOrder { expected: u64, actual: u64 },
}
