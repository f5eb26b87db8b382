use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Terminal failure reasons for a single entity operation.
///
/// These are recorded in the run ledger rather than propagated as `Err`:
/// one item failing must never abort the stage or the run. `Conflict` and
/// `PreconditionFailed` are data problems, not bugs, and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    #[error("required {parent_kind} '{parent_name}' was not resolved")]
    PreconditionFailed {
        parent_kind: &'static str,
        parent_name: String,
    },

    #[error("existing entity conflicts: {0}")]
    Conflict(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server rejected request: {0}")]
    ServerRejected(String),
}

impl OperationError {
    /// Short machine-readable label used in summaries and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OperationError::PreconditionFailed { .. } => "precondition_failed",
            OperationError::Conflict(_) => "conflict",
            OperationError::Transport(_) => "transport",
            OperationError::ServerRejected(_) => "server_rejected",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
