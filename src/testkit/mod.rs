//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! - [`fake`] - [`FakeApi`](fake::FakeApi), an in-memory stand-in for the
//!   remote platform API with scriptable failures and write-call counters.

pub mod fake;

pub use fake::{CreateScript, FakeApi};
