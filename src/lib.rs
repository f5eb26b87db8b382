//! seedctl - idempotent seeding and verification for the affiliate
//! platform API.
//!
//! The tool provisions a hierarchy of business entities (organizations,
//! user profiles, advertisers, affiliates, campaigns, analytics records)
//! against a remote API and is safe to re-run any number of times: every
//! creation goes through a check-then-create-with-conflict-recovery
//! operation, and a dependency-ordered orchestrator threads resolved
//! parent identifiers into child requests while tolerating and reporting
//! partial failures instead of aborting.
//!
//! # Modules
//!
//! - [`api`] - transport client with bounded retries and wire types
//! - [`provision`] - idempotent entity operations, the staged
//!   orchestrator, the run ledger, and the built-in seed dataset
//! - [`verify`] - read-only verification of provisioned entities
//! - [`cli`] - command definitions and handlers
//! - [`error`] - error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use seedctl::api::ApiClient;
//! use seedctl::provision::{Orchestrator, SeedData};
//!
//! # async fn run() -> seedctl::error::Result<()> {
//! let api = ApiClient::new("http://localhost:8080", None, Duration::from_secs(30))?;
//! let seed = SeedData::builtin();
//! let ledger = Orchestrator::new(&api, &seed).run().await;
//! assert!(ledger.is_clean());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod error;
pub mod provision;
pub mod verify;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
