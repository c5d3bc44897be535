//! AcadChain Contract - academic records lifecycle
//!
//! Every operation takes the contract (configuration) and an explicit
//! `TxContext` carrying the store view, caller identity, clock and event
//! channel. An operation either returns `Ok` and its whole write-set commits,
//! or returns a `ContractError` and nothing does.
//!
//! # Modules
//! - `store` / `schema`: keyed store adapter and secondary index maintenance
//! - `access`: organization and attribute-claim checks
//! - `aggregation`: cumulative GPA over completed records
//! - `students`, `departments`, `records`, `workflow`, `certificates`,
//!   `documents`, `registrations`, `consent`: entity operations

pub mod access;
pub mod aggregation;
pub mod certificates;
pub mod config;
pub mod consent;
pub mod departments;
pub mod documents;
pub mod error;
pub mod events;
pub mod records;
pub mod registrations;
pub mod schema;
pub mod store;
pub mod students;
pub mod workflow;

pub use access::{AccessPolicy, Organization};
pub use aggregation::Standing;
pub use certificates::{CertificateView, NewCertificate};
pub use config::{AccessConfig, ContractConfig};
pub use departments::{DepartmentUpdate, NewCourseOffering, NewDepartment, OfferingUpdate};
pub use documents::{DocumentStatusUpdate, NewDocument};
pub use error::{ContractError, ContractResult, ErrorKind};
pub use events::EventKind;
pub use records::{CourseInput, NewAcademicRecord};
pub use registrations::NewRegistration;
pub use store::{IndexAudit, PaginatedQueryResult};
pub use students::{ContactUpdate, NewStudent};

use acad_approval::ApprovalWorkflow;
use acad_ledger::TxContext;

/// The academic records contract
#[derive(Debug, Clone)]
pub struct AcademicContract {
    config: ContractConfig,
    access: AccessPolicy,
    workflow: ApprovalWorkflow,
}

impl AcademicContract {
    pub fn new(config: ContractConfig) -> Self {
        Self {
            access: AccessPolicy::new(config.access.clone()),
            workflow: ApprovalWorkflow::new(config.workflow.clone()),
            config,
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn access(&self) -> &AccessPolicy {
        &self.access
    }

    /// Mark the ledger as initialized
    pub fn init_ledger(&self, ctx: &mut TxContext<'_>) -> ContractResult<()> {
        let at = ctx.tx_timestamp();
        events::emit(
            ctx,
            EventKind::LedgerInitialized,
            &serde_json::json!({ "initializedAt": at }),
        )?;
        tracing::info!("academic records ledger initialized");
        Ok(())
    }
}

impl Default for AcademicContract {
    fn default() -> Self {
        Self::new(ContractConfig::default())
    }
}
