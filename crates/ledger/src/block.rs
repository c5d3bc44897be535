//! Committed blocks - one per successful invocation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named notification emitted by an invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// One public write; `value == None` is a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOp {
    pub key: String,
    #[serde(with = "hex_value")]
    pub value: Option<Vec<u8>>,
}

/// Private writes are committed as hashes only; the values stay off the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateWriteHash {
    pub collection: String,
    pub key_hash: String,
    pub value_hash: Option<String>,
}

/// A committed transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub number: u64,
    pub prev_hash: String,
    pub hash: String,
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
    /// Organization of the invoking client
    pub creator: String,
    pub writes: Vec<WriteOp>,
    #[serde(default)]
    pub private_writes: Vec<PrivateWriteHash>,
    #[serde(default)]
    pub events: Vec<ContractEvent>,
}

impl Block {
    /// Whether this block carries an event with the given name
    pub fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e.name == name)
    }
}

mod hex_value {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_op_hex_encoding() {
        let op = WriteOp {
            key: "k".into(),
            value: Some(b"{}".to_vec()),
        };
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(json, r#"{"key":"k","value":"7b7d"}"#);

        let back: WriteOp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, op);

        let delete: WriteOp = serde_json::from_str(r#"{"key":"k","value":null}"#).unwrap();
        assert_eq!(delete.value, None);
    }
}
