//! Roles that stamp approval steps

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Role claim a caller acts under for one workflow stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApprovalRole {
    Department,
    Faculty,
    Hod,
    ExamSection,
    DeanAcademic,
    DacMember,
    Registrar,
}

impl ApprovalRole {
    /// Roles held by department staff rather than the central registrar office
    pub fn is_departmental(&self) -> bool {
        matches!(
            self,
            ApprovalRole::Department | ApprovalRole::Faculty | ApprovalRole::Hod
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_claims() {
        assert_eq!(ApprovalRole::ExamSection.to_string(), "exam_section");
        assert_eq!(ApprovalRole::from_str("dac_member").unwrap(), ApprovalRole::DacMember);
        assert!(ApprovalRole::Hod.is_departmental());
        assert!(!ApprovalRole::DeanAcademic.is_departmental());
    }
}
