//! The check-then-create-with-conflict-recovery algorithm.
//!
//! [`ensure`] is the one generic operation; each entity type supplies an
//! [`EntityPlan`] describing its paths, payload, identity key, and the
//! attributes that must agree on a match. Profiles and analytics records
//! use the [`upsert`] and [`submit_record`] variants instead of re-deriving
//! the algorithm.

use serde_json::Value;
use tracing::{debug, info};

use crate::api::types::{extract_list, EntityId};
use crate::api::{ApiClient, ApiResponse};
use crate::error::OperationError;

use super::ledger::OpResult;

/// Capability table driving [`ensure`] for one entity.
#[derive(Debug, Clone)]
pub struct EntityPlan {
    /// Path listed when probing for an existing entity.
    pub list_path: String,
    /// Field name under which list responses may wrap the array.
    pub wrapper: &'static str,
    /// Path POSTed to when the probe finds nothing.
    pub create_path: String,
    /// Full creation payload.
    pub payload: Value,
    /// Field carrying the server-assigned identifier.
    pub id_field: &'static str,
    /// Fields that must match exactly for a listed entity to count as this
    /// one: the identity key plus any parent references that scope it.
    pub identity: Vec<(&'static str, Value)>,
    /// Fields that must additionally agree on a matched entity. A mismatch
    /// is a conflict to report, never something to create over or mutate.
    pub consistency: Vec<(&'static str, Value)>,
}

impl EntityPlan {
    fn matches(&self, candidate: &Value) -> bool {
        self.identity
            .iter()
            .all(|(field, expected)| candidate.get(*field) == Some(expected))
    }

    fn consistency_mismatch(&self, existing: &Value) -> Option<String> {
        for (field, expected) in &self.consistency {
            let actual = existing.get(*field).cloned().unwrap_or(Value::Null);
            if &actual != expected {
                return Some(format!(
                    "existing entity has {field}={actual}, expected {expected}"
                ));
            }
        }
        None
    }

    fn id_of(&self, entity: &Value) -> Option<EntityId> {
        entity.get(self.id_field).and_then(EntityId::from_value)
    }
}

/// Whether a failed creation response signals that the entity already
/// exists.
///
/// A documented but fragile contract with the remote API: duplicates
/// surface either as a 409 or as marker text in the error message. Kept in
/// one place so the heuristic can be swapped for a structured error code
/// without touching the algorithm.
pub fn is_duplicate_signal(response: &ApiResponse) -> bool {
    if response.status == 409 {
        return true;
    }
    let text = response.error_text().to_lowercase();
    text.contains("duplicate") || text.contains("already exists")
}

fn classify_rejection(response: &ApiResponse) -> OperationError {
    if response.is_transport_failure() {
        OperationError::Transport(response.error_text())
    } else {
        OperationError::ServerRejected(response.error_text())
    }
}

async fn probe(api: &ApiClient, plan: &EntityPlan) -> Result<Option<Value>, OperationError> {
    let response = api.get(&plan.list_path).await;
    if !response.ok() {
        return Err(classify_rejection(&response));
    }
    let entities = extract_list(&response.payload, plan.wrapper);
    Ok(entities.into_iter().find(|e| plan.matches(e)))
}

/// Resolve an entity to an identifier, creating it only if no entity with
/// the same identity key exists in scope. Safe to invoke any number of
/// times: the second invocation classifies as already-exists with the same
/// identifier.
pub async fn ensure(api: &ApiClient, plan: &EntityPlan) -> OpResult {
    let existing = match probe(api, plan).await {
        Ok(existing) => existing,
        Err(error) => return OpResult::failed(error),
    };

    if let Some(existing) = existing {
        return match plan.consistency_mismatch(&existing) {
            None => {
                debug!(id = ?plan.id_of(&existing), "entity already present");
                OpResult::already_exists(plan.id_of(&existing))
            }
            Some(detail) => OpResult::failed(OperationError::Conflict(detail)),
        };
    }

    let response = api.post(&plan.create_path, &plan.payload).await;
    if response.ok() {
        return OpResult::created(
            response
                .payload
                .get(plan.id_field)
                .and_then(EntityId::from_value),
        );
    }

    // A concurrent writer may have created the same name between the probe
    // and the create; one recheck resolves the race to already-exists.
    if is_duplicate_signal(&response) {
        return match probe(api, plan).await {
            Ok(Some(existing)) => {
                info!("creation race recovered to existing entity");
                OpResult::already_exists(plan.id_of(&existing))
            }
            Ok(None) => OpResult::failed(OperationError::ServerRejected(
                "conflict reported but entity not found on recheck".to_string(),
            )),
            Err(error) => OpResult::failed(error),
        };
    }

    OpResult::failed(classify_rejection(&response))
}

/// Upsert variant used for profiles. The server owns the existence check,
/// keyed by the caller-supplied stable identifier: 201 means a profile was
/// inserted, any other 2xx means an existing one was updated.
pub async fn upsert(api: &ApiClient, path: &str, payload: &Value, id: EntityId) -> OpResult {
    let response = api.post(path, payload).await;
    if response.ok() {
        if response.status == 201 {
            OpResult::created(Some(id))
        } else {
            OpResult::updated(id)
        }
    } else {
        OpResult::failed(classify_rejection(&response))
    }
}

/// Fire-and-classify variant for analytics records. There is no identity
/// key to probe and no identifier comes back to disambiguate, so a
/// duplicate signal maps straight to already-exists.
pub async fn submit_record(api: &ApiClient, path: &str, payload: &Value) -> OpResult {
    let response = api.post(path, payload).await;
    if response.ok() {
        OpResult::created(None)
    } else if is_duplicate_signal(&response) {
        OpResult::already_exists(None)
    } else {
        OpResult::failed(classify_rejection(&response))
    }
}
