//! Deterministic summary derived from a run ledger.
//!
//! The reporter is the only place failures are aggregated: per-category
//! counts plus a flat failure list carrying the raw diagnostics. Whether
//! the run "succeeded" is a derived property computed here, not something
//! the orchestrator decides.

use super::ledger::{Category, Ledger, Outcome};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub created: usize,
    pub already_exists: usize,
    pub updated: usize,
    pub failed: usize,
}

impl CategoryCounts {
    pub fn total(&self) -> usize {
        self.created + self.already_exists + self.updated + self.failed
    }
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub category: Category,
    pub key: String,
    pub kind: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    counts: Vec<(Category, CategoryCounts)>,
    failures: Vec<Failure>,
}

impl RunReport {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut counts = Vec::new();
        for category in Category::ALL {
            let mut tally = CategoryCounts::default();
            for entry in ledger.in_category(category) {
                match entry.outcome {
                    Outcome::Created => tally.created += 1,
                    Outcome::AlreadyExists => tally.already_exists += 1,
                    Outcome::Updated => tally.updated += 1,
                    Outcome::Failed => tally.failed += 1,
                }
            }
            if tally.total() > 0 {
                counts.push((category, tally));
            }
        }

        let failures = ledger
            .failures()
            .map(|entry| Failure {
                category: entry.category,
                key: entry.key.clone(),
                kind: entry.error.as_ref().map(|e| e.kind()).unwrap_or("failed"),
                detail: entry
                    .error
                    .as_ref()
                    .map(|e| e.to_string())
                    .unwrap_or_default(),
            })
            .collect();

        Self { counts, failures }
    }

    pub fn counts(&self) -> &[(Category, CategoryCounts)] {
        &self.counts
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// True when every ledger entry classified as created, already-exists,
    /// or updated.
    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::error::OperationError;
    use crate::provision::ledger::OpResult;

    #[test]
    fn counts_group_by_category_and_outcome() {
        let mut ledger = Ledger::new();
        ledger.record(
            Category::Organizations,
            "Acme",
            OpResult::created(Some(EntityId::Number(1))),
        );
        ledger.record(
            Category::Organizations,
            "Globex",
            OpResult::already_exists(Some(EntityId::Number(2))),
        );
        ledger.record(
            Category::Profiles,
            "a@acme.com",
            OpResult::updated(EntityId::Text("u-1".into())),
        );
        ledger.record(
            Category::Campaigns,
            "Launch",
            OpResult::failed(OperationError::ServerRejected("invalid payout".into())),
        );

        let report = RunReport::from_ledger(&ledger);
        assert!(!report.success());

        let orgs = report
            .counts()
            .iter()
            .find(|(c, _)| *c == Category::Organizations)
            .map(|(_, t)| *t)
            .expect("organizations counted");
        assert_eq!(orgs.created, 1);
        assert_eq!(orgs.already_exists, 1);
        assert_eq!(orgs.failed, 0);

        // empty categories are omitted entirely
        assert!(!report
            .counts()
            .iter()
            .any(|(c, _)| *c == Category::Affiliates));

        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].kind, "server_rejected");
        assert!(report.failures()[0].detail.contains("invalid payout"));
    }

    #[test]
    fn clean_ledger_reports_success() {
        let mut ledger = Ledger::new();
        ledger.record(Category::Analytics, "advertiser_acme.com", OpResult::created(None));
        let report = RunReport::from_ledger(&ledger);
        assert!(report.success());
        assert!(report.failures().is_empty());
    }
}
