//! Hash chain utilities for block integrity

use crate::block::Block;
use sha2::{Digest, Sha256};

/// `prev_hash` of the first block
pub const GENESIS: &str = "GENESIS";

/// Hex SHA-256 of arbitrary bytes
pub fn sha256_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha256::digest(data.as_ref()))
}

/// Calculate SHA256 hash of block content (excluding the hash field itself)
pub fn calculate_block_hash(block: &Block) -> String {
    let mut hasher = Sha256::new();

    hasher.update(block.number.to_le_bytes());
    hasher.update(block.prev_hash.as_bytes());
    hasher.update(block.tx_id.as_bytes());
    hasher.update(block.timestamp.to_rfc3339().as_bytes());
    hasher.update(block.creator.as_bytes());

    // Writes are already in key order
    for write in &block.writes {
        hasher.update(write.key.as_bytes());
        match &write.value {
            Some(value) => {
                hasher.update([1u8]);
                hasher.update(value);
            }
            None => hasher.update([0u8]),
        }
    }

    for private in &block.private_writes {
        hasher.update(private.collection.as_bytes());
        hasher.update(private.key_hash.as_bytes());
        if let Some(ref value_hash) = private.value_hash {
            hasher.update(value_hash.as_bytes());
        }
    }

    for event in &block.events {
        hasher.update(event.name.as_bytes());
        hasher.update(event.payload.to_string().as_bytes());
    }

    hex::encode(hasher.finalize())
}

/// Verify hash chain integrity
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS.to_string();

    for (i, block) in blocks.iter().enumerate() {
        if block.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                number: block.number,
                expected: prev_hash,
                actual: block.prev_hash.clone(),
            });
        }

        let calculated = calculate_block_hash(block);
        if block.hash != calculated {
            return Err(ChainError::InvalidHash {
                number: block.number,
                expected: calculated,
                actual: block.hash.clone(),
            });
        }

        let expected_number = i as u64 + 1;
        if block.number != expected_number {
            return Err(ChainError::InvalidNumber {
                expected: expected_number,
                actual: block.number,
            });
        }

        prev_hash = block.hash.clone();
    }

    Ok(())
}

/// Errors in hash chain verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    BrokenLink {
        number: u64,
        expected: String,
        actual: String,
    },
    InvalidHash {
        number: u64,
        expected: String,
        actual: String,
    },
    InvalidNumber {
        expected: u64,
        actual: u64,
    },
}

impl std::fmt::Display for ChainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChainError::BrokenLink {
                number,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Broken link at block {}: expected prev_hash '{}', got '{}'",
                    number, expected, actual
                )
            }
            ChainError::InvalidHash {
                number,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Invalid hash at block {}: expected '{}', got '{}'",
                    number, expected, actual
                )
            }
            ChainError::InvalidNumber { expected, actual } => {
                write!(f, "Invalid block number: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ChainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ContractEvent, WriteOp};
    use chrono::Utc;

    fn create_block(number: u64, prev_hash: &str) -> Block {
        let mut block = Block {
            number,
            prev_hash: prev_hash.to_string(),
            hash: String::new(),
            tx_id: format!("tx-{}", number),
            timestamp: Utc::now(),
            creator: "NITWarangalMSP".to_string(),
            writes: vec![WriteOp {
                key: format!("key-{}", number),
                value: Some(b"value".to_vec()),
            }],
            private_writes: vec![],
            events: vec![ContractEvent {
                name: "StudentCreated".into(),
                payload: serde_json::json!({ "rollNumber": "21CS1001" }),
            }],
        };
        block.hash = calculate_block_hash(&block);
        block
    }

    #[test]
    fn test_hash_deterministic() {
        let block = create_block(1, GENESIS);
        assert_eq!(calculate_block_hash(&block), calculate_block_hash(&block));
    }

    #[test]
    fn test_hash_covers_writes() {
        let block = create_block(1, GENESIS);
        let mut tampered = block.clone();
        tampered.writes[0].value = Some(b"other".to_vec());
        assert_ne!(calculate_block_hash(&block), calculate_block_hash(&tampered));
    }

    #[test]
    fn test_verify_valid_chain() {
        let b1 = create_block(1, GENESIS);
        let b2 = create_block(2, &b1.hash);
        let b3 = create_block(3, &b2.hash);
        assert!(verify_chain(&[b1, b2, b3]).is_ok());
    }

    #[test]
    fn test_verify_broken_chain() {
        let b1 = create_block(1, GENESIS);
        let b2 = create_block(2, "wrong_hash");
        let result = verify_chain(&[b1, b2]);
        assert!(matches!(result, Err(ChainError::BrokenLink { .. })));
    }

    #[test]
    fn test_verify_detects_tampering() {
        let b1 = create_block(1, GENESIS);
        let mut b2 = create_block(2, &b1.hash);
        b2.creator = "VerifiersMSP".into();
        let result = verify_chain(&[b1, b2]);
        assert!(matches!(result, Err(ChainError::InvalidHash { number: 2, .. })));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
