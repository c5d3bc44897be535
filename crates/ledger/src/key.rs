//! Composite keys
//!
//! A composite key joins a namespace with an ordered list of components:
//! `\0namespace\0c1\0c2\0`. Prefix scans over a namespace and its leading
//! components therefore return entries in component byte-order.

use crate::error::LedgerError;
use std::fmt;

const DELIMITER: char = '\u{0}';

/// Namespace plus ordered components, encoded as a single store key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeKey {
    namespace: String,
    components: Vec<String>,
}

impl CompositeKey {
    /// Create a key, rejecting empty namespaces and embedded delimiters
    pub fn new<I, S>(namespace: &str, components: I) -> Result<Self, LedgerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if namespace.is_empty() {
            return Err(LedgerError::InvalidKey("namespace cannot be empty".into()));
        }
        if namespace.contains(DELIMITER) {
            return Err(LedgerError::InvalidKey(format!(
                "namespace {:?} contains a delimiter",
                namespace
            )));
        }

        let components: Vec<String> = components.into_iter().map(Into::into).collect();
        for component in &components {
            if component.contains(DELIMITER) {
                return Err(LedgerError::InvalidKey(format!(
                    "component {:?} contains a delimiter",
                    component
                )));
            }
        }

        Ok(Self {
            namespace: namespace.to_string(),
            components,
        })
    }

    /// Decode a key produced by [`CompositeKey::encode`]
    pub fn parse(key: &str) -> Result<Self, LedgerError> {
        let body = key
            .strip_prefix(DELIMITER)
            .and_then(|rest| rest.strip_suffix(DELIMITER))
            .ok_or_else(|| LedgerError::InvalidKey(format!("{:?} is not a composite key", key)))?;

        let mut parts = body.split(DELIMITER);
        let namespace = parts
            .next()
            .filter(|ns| !ns.is_empty())
            .ok_or_else(|| LedgerError::InvalidKey(format!("{:?} has no namespace", key)))?;

        Ok(Self {
            namespace: namespace.to_string(),
            components: parts.map(str::to_string).collect(),
        })
    }

    /// Encoded store key
    pub fn encode(&self) -> String {
        let mut key = String::new();
        key.push(DELIMITER);
        key.push_str(&self.namespace);
        key.push(DELIMITER);
        for component in &self.components {
            key.push_str(component);
            key.push(DELIMITER);
        }
        key
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Last component, the identifying suffix of an index entry
    pub fn last_component(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace)?;
        for component in &self.components {
            write!(f, "~{}", component)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_parse_roundtrip() {
        let key = CompositeKey::new("student~dept", ["CSE", "21CS1001"]).unwrap();
        let encoded = key.encode();
        assert_eq!(encoded, "\u{0}student~dept\u{0}CSE\u{0}21CS1001\u{0}");

        let parsed = CompositeKey::parse(&encoded).unwrap();
        assert_eq!(parsed, key);
        assert_eq!(parsed.last_component(), Some("21CS1001"));
    }

    #[test]
    fn test_partial_key_is_prefix() {
        let full = CompositeKey::new("record~status", ["DRAFT", "S1", "R1"]).unwrap();
        let partial = CompositeKey::new("record~status", ["DRAFT"]).unwrap();
        assert!(full.encode().starts_with(&partial.encode()));

        let other = CompositeKey::new("record~status", ["DRAFTED", "S1", "R1"]).unwrap();
        assert!(!other.encode().starts_with(&partial.encode()));
    }

    #[test]
    fn test_rejects_delimiter() {
        assert!(CompositeKey::new("ns", ["a\u{0}b"]).is_err());
        assert!(CompositeKey::new("", ["a"]).is_err());
    }

    #[test]
    fn test_parse_rejects_simple_keys() {
        assert!(CompositeKey::parse("plain-key").is_err());
        assert!(CompositeKey::parse("\u{0}\u{0}").is_err());
    }

    #[test]
    fn test_display() {
        let key = CompositeKey::new("cert~student", ["S1", "C1"]).unwrap();
        assert_eq!(key.to_string(), "cert~student~S1~C1");
    }
}
