//! Caller identity as presented by the ledger

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Organization membership and attribute claims of the invoking client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    /// Unique client identifier
    pub id: String,
    /// Organization (membership service provider) the client belongs to
    pub msp_id: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ClientIdentity {
    pub fn new(id: impl Into<String>, msp_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msp_id: msp_id.into(),
            attributes: HashMap::new(),
        }
    }

    /// Add an attribute claim
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute claim
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes() {
        let identity = ClientIdentity::new("hod-cse", "DepartmentsMSP")
            .with_attribute("department", "CSE")
            .with_attribute("role", "hod");

        assert_eq!(identity.attribute("department"), Some("CSE"));
        assert_eq!(identity.attribute("role"), Some("hod"));
        assert_eq!(identity.attribute("rollNumber"), None);
    }
}
