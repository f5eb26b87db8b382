//! The run ledger: one terminal classification per attempted entity.
//!
//! The ledger is a value owned by the orchestrator for the lifetime of a
//! single run and returned to the caller, never a process-wide singleton.
//! Entries are appended when an operation reaches its terminal state and
//! are not mutated afterwards; persistent state lives only in the remote
//! API.

use serde::Serialize;

use crate::api::types::EntityId;
use crate::error::OperationError;

/// Terminal classification of one entity operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    AlreadyExists,
    Updated,
    Failed,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        !matches!(self, Outcome::Failed)
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::Created => "created",
            Outcome::AlreadyExists => "already exists",
            Outcome::Updated => "updated",
            Outcome::Failed => "failed",
        }
    }
}

/// Entity categories, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Organizations,
    Profiles,
    Advertisers,
    Affiliates,
    Campaigns,
    Analytics,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Organizations,
        Category::Profiles,
        Category::Advertisers,
        Category::Affiliates,
        Category::Campaigns,
        Category::Analytics,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Category::Organizations => "Organizations",
            Category::Profiles => "Profiles",
            Category::Advertisers => "Advertisers",
            Category::Affiliates => "Affiliates",
            Category::Campaigns => "Campaigns",
            Category::Analytics => "Analytics",
        }
    }
}

/// Outcome of a single operation before it is keyed into the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct OpResult {
    pub outcome: Outcome,
    pub id: Option<EntityId>,
    pub error: Option<OperationError>,
}

impl OpResult {
    pub fn created(id: Option<EntityId>) -> Self {
        Self {
            outcome: Outcome::Created,
            id,
            error: None,
        }
    }

    pub fn already_exists(id: Option<EntityId>) -> Self {
        Self {
            outcome: Outcome::AlreadyExists,
            id,
            error: None,
        }
    }

    pub fn updated(id: EntityId) -> Self {
        Self {
            outcome: Outcome::Updated,
            id: Some(id),
            error: None,
        }
    }

    pub fn failed(error: OperationError) -> Self {
        Self {
            outcome: Outcome::Failed,
            id: None,
            error: Some(error),
        }
    }
}

/// One finalized row of the ledger.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub category: Category,
    pub key: String,
    pub outcome: Outcome,
    pub id: Option<EntityId>,
    pub error: Option<OperationError>,
}

/// Append-only, insertion-ordered record of every attempted entity.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, category: Category, key: impl Into<String>, result: OpResult) {
        self.entries.push(LedgerEntry {
            category,
            key: key.into(),
            outcome: result.outcome,
            id: result.id,
            error: result.error,
        });
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn get(&self, category: Category, key: &str) -> Option<&LedgerEntry> {
        self.entries
            .iter()
            .find(|e| e.category == category && e.key == key)
    }

    /// Identifier of a successfully resolved entity. `None` when the entity
    /// was never attempted or its terminal classification was failed — the
    /// precondition gate children check before attempting creation.
    pub fn resolved_id(&self, category: Category, key: &str) -> Option<&EntityId> {
        self.get(category, key)
            .filter(|e| e.outcome.is_success())
            .and_then(|e| e.id.as_ref())
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    pub fn failures(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries
            .iter()
            .filter(|e| e.outcome == Outcome::Failed)
    }

    /// True when every attempted entity resolved successfully.
    pub fn is_clean(&self) -> bool {
        self.entries.iter().all(|e| e.outcome.is_success())
    }
}
