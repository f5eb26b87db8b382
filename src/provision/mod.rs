//! Idempotent provisioning: entity operations, staged orchestration, and
//! the run ledger that records every attempted entity.

pub mod ledger;
pub mod ops;
pub mod orchestrator;
pub mod report;
pub mod seed;

pub use ledger::{Category, Ledger, LedgerEntry, OpResult, Outcome};
pub use orchestrator::Orchestrator;
pub use report::RunReport;
pub use seed::SeedData;
