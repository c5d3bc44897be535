//! Identity and access policy
//!
//! Three shapes of check:
//! - organization allow-lists
//! - organization plus a department attribute claim (central bypasses)
//! - unrestricted reads whose results are post-filtered per department

use crate::config::AccessConfig;
use crate::error::{ContractError, ContractResult};
use acad_approval::ApprovalRole;
use acad_ledger::ClientIdentity;

/// Role claim that satisfies every stage check for central callers
const ADMIN_ROLE: &str = "admin";

/// Role claim a student carries when acting on their own behalf
const STUDENT_ROLE: &str = "student";

/// Organization classes known to the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Organization {
    Central,
    Department,
    Verifier,
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    config: AccessConfig,
}

impl AccessPolicy {
    pub fn new(config: AccessConfig) -> Self {
        Self { config }
    }

    /// Classify the caller's organization
    pub fn organization(&self, identity: &ClientIdentity) -> Option<Organization> {
        let msp = identity.msp_id.as_str();
        if msp == self.config.central_org {
            Some(Organization::Central)
        } else if msp == self.config.department_org {
            Some(Organization::Department)
        } else if msp == self.config.verifier_org {
            Some(Organization::Verifier)
        } else {
            None
        }
    }

    fn org_name(&self, org: Organization) -> &str {
        match org {
            Organization::Central => &self.config.central_org,
            Organization::Department => &self.config.department_org,
            Organization::Verifier => &self.config.verifier_org,
        }
    }

    /// Caller's organization must be one of `allowed`
    pub fn require_org(&self, identity: &ClientIdentity, allowed: &[Organization]) -> ContractResult<Organization> {
        match self.organization(identity) {
            Some(org) if allowed.contains(&org) => Ok(org),
            _ => {
                let expected = allowed
                    .iter()
                    .map(|org| self.org_name(*org))
                    .collect::<Vec<_>>()
                    .join(" or ");
                tracing::warn!(client = %identity.id, msp = %identity.msp_id, expected = %expected, "organization check failed");
                Err(ContractError::Unauthorized {
                    expected,
                    actual: identity.msp_id.clone(),
                })
            }
        }
    }

    pub fn require_central(&self, identity: &ClientIdentity) -> ContractResult<()> {
        self.require_org(identity, &[Organization::Central])?;
        self.note_missing_role(identity);
        Ok(())
    }

    /// Central callers act on any department; department callers only on
    /// the department named in their attribute claim
    pub fn require_department(&self, identity: &ClientIdentity, department: &str) -> ContractResult<()> {
        match self.require_org(identity, &[Organization::Central, Organization::Department])? {
            Organization::Central => {
                self.note_missing_role(identity);
                Ok(())
            }
            _ => {
                let claimed = identity.attribute(&self.config.department_attribute);
                if claimed.is_some_and(|c| c.eq_ignore_ascii_case(department)) {
                    return Ok(());
                }
                tracing::warn!(client = %identity.id, department = %department, "department scope check failed");
                Err(ContractError::Unauthorized {
                    expected: format!("{}={}", self.config.department_attribute, department),
                    actual: format!(
                        "{}={}",
                        self.config.department_attribute,
                        claimed.unwrap_or("<none>")
                    ),
                })
            }
        }
    }

    /// Whether a list result belonging to `department` is visible to the caller
    pub fn can_view_department(&self, identity: &ClientIdentity, department: &str) -> bool {
        match self.organization(identity) {
            Some(Organization::Central) => true,
            Some(Organization::Department) => identity
                .attribute(&self.config.department_attribute)
                .is_some_and(|c| c.eq_ignore_ascii_case(department)),
            _ => false,
        }
    }

    /// Authorize a workflow stage performed under `role` on a record of `department`
    pub fn require_stage(
        &self,
        identity: &ClientIdentity,
        role: ApprovalRole,
        department: &str,
    ) -> ContractResult<()> {
        let claimed = identity.attribute(&self.config.role_attribute);

        if role.is_departmental() {
            self.require_department(identity, department)?;
            if self.organization(identity) == Some(Organization::Department) {
                // Department staff must carry the specific stage role
                if role != ApprovalRole::Department && claimed != Some(role.to_string().as_str()) {
                    return Err(self.role_mismatch(identity, role, claimed));
                }
                return Ok(());
            }
        } else {
            self.require_org(identity, &[Organization::Central])?;
        }

        match claimed {
            None => {
                self.note_missing_role(identity);
                Ok(())
            }
            Some(ADMIN_ROLE) => Ok(()),
            Some(c) if c == role.to_string() => Ok(()),
            Some(_) => Err(self.role_mismatch(identity, role, claimed)),
        }
    }

    fn role_mismatch(&self, identity: &ClientIdentity, role: ApprovalRole, claimed: Option<&str>) -> ContractError {
        tracing::warn!(client = %identity.id, required = %role, "role claim check failed");
        ContractError::Unauthorized {
            expected: format!("{}={}", self.config.role_attribute, role),
            actual: format!(
                "{}={}",
                self.config.role_attribute,
                claimed.unwrap_or("<none>")
            ),
        }
    }

    /// Consent is managed by the registrar, or by a student for their own roll number
    pub fn require_consent_authority(&self, identity: &ClientIdentity, student_id: &str) -> ContractResult<()> {
        self.require_org(identity, &[Organization::Central])?;

        if identity.attribute(&self.config.role_attribute) == Some(STUDENT_ROLE) {
            let own = identity.attribute(&self.config.roll_number_attribute);
            if own != Some(student_id) {
                return Err(ContractError::Unauthorized {
                    expected: format!("{}={}", self.config.roll_number_attribute, student_id),
                    actual: format!(
                        "{}={}",
                        self.config.roll_number_attribute,
                        own.unwrap_or("<none>")
                    ),
                });
            }
        }
        Ok(())
    }

    fn note_missing_role(&self, identity: &ClientIdentity) {
        if identity.attribute(&self.config.role_attribute).is_none() {
            tracing::info!(client = %identity.id, "no role attribute; authorized by organization");
        }
    }
}
