//! In-memory stand-in for the remote platform API.
//!
//! Implements [`Transport`] directly, so no retry delays apply and tests
//! run without a network. Collections enforce the same unique constraints
//! the real backend does and report duplicates as 409 with marker text.
//! Creation calls can be scripted to fail, which is how the race-recovery
//! and gating properties get exercised.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{json, Value};

use crate::api::{paths, ApiClient, ApiResponse, Transport};

/// Scripted behavior for one creation call on a path, consumed in order.
#[derive(Debug, Clone)]
pub enum CreateScript {
    /// Reject with the given status and error message; store nothing.
    Reject { status: u16, message: String },
    /// Store the entity as if a concurrent writer won the race, then
    /// report a duplicate-key failure for this call.
    RaceConflict,
    /// Report a duplicate-key failure without storing anything.
    PhantomConflict,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    organizations: Vec<Value>,
    advertisers: Vec<Value>,
    affiliates: Vec<Value>,
    campaigns: Vec<Value>,
    profiles: HashMap<String, Value>,
    analytics_advertisers: Vec<Value>,
    analytics_affiliates: Vec<Value>,
    scripts: HashMap<String, VecDeque<CreateScript>>,
    write_calls: HashMap<String, usize>,
    unhealthy: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// An [`ApiClient`] wired to this fake; clones share state.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_transport(Box::new(self.clone()))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unhealthy = !healthy;
    }

    /// Queue a scripted behavior for the next creation call on `path`.
    pub fn script_create(&self, path: &str, script: CreateScript) {
        self.state
            .lock()
            .scripts
            .entry(path.to_string())
            .or_default()
            .push_back(script);
    }

    /// Number of POSTs received on `path`, scripted or not.
    pub fn write_calls(&self, path: &str) -> usize {
        self.state
            .lock()
            .write_calls
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Server-assigned id of the first stored entity on `path` whose
    /// `name` matches.
    pub fn entity_id(&self, path: &str, name: &str) -> Option<i64> {
        let state = self.state.lock();
        let (collection, id_field, _) = state.collection(path)?;
        collection
            .iter()
            .find(|e| e.get("name").and_then(Value::as_str) == Some(name))
            .and_then(|e| e.get(id_field))
            .and_then(Value::as_i64)
    }

    /// Number of entities stored on `path`.
    pub fn stored(&self, path: &str) -> usize {
        let state = self.state.lock();
        state.collection(path).map(|(c, _, _)| c.len()).unwrap_or(0)
    }

    /// Raw stored entity by name, for attribute assertions.
    pub fn entity(&self, path: &str, name: &str) -> Option<Value> {
        let state = self.state.lock();
        let (collection, _, _) = state.collection(path)?;
        collection
            .iter()
            .find(|e| e.get("name").and_then(Value::as_str) == Some(name))
            .cloned()
    }
}

impl FakeState {
    fn collection(&self, path: &str) -> Option<(&Vec<Value>, &'static str, &'static [&'static str])> {
        match path {
            paths::ORGANIZATIONS => Some((&self.organizations, "organization_id", &["name"])),
            paths::ADVERTISERS => Some((
                &self.advertisers,
                "advertiser_id",
                &["name", "organization_id"],
            )),
            paths::AFFILIATES => Some((
                &self.affiliates,
                "affiliate_id",
                &["name", "organization_id"],
            )),
            paths::CAMPAIGNS => Some((&self.campaigns, "campaign_id", &["name", "advertiser_id"])),
            paths::ANALYTICS_ADVERTISERS => {
                Some((&self.analytics_advertisers, "analytics_id", &["domain"]))
            }
            paths::ANALYTICS_AFFILIATES => {
                Some((&self.analytics_affiliates, "analytics_id", &["domain"]))
            }
            _ => None,
        }
    }

    fn insert(&mut self, path: &str, body: &Value) -> Value {
        self.next_id += 1;
        let id = self.next_id;
        let mut entity = body.clone();
        let (id_field, collection) = match path {
            paths::ORGANIZATIONS => ("organization_id", &mut self.organizations),
            paths::ADVERTISERS => ("advertiser_id", &mut self.advertisers),
            paths::AFFILIATES => ("affiliate_id", &mut self.affiliates),
            paths::CAMPAIGNS => ("campaign_id", &mut self.campaigns),
            paths::ANALYTICS_ADVERTISERS => ("analytics_id", &mut self.analytics_advertisers),
            paths::ANALYTICS_AFFILIATES => ("analytics_id", &mut self.analytics_affiliates),
            _ => unreachable!("insert on unknown path {path}"),
        };
        entity[id_field] = json!(id);
        collection.push(entity.clone());
        entity
    }

    fn handle_get(&self, path: &str) -> ApiResponse {
        if let Some(raw_query) = path.strip_prefix(paths::ANALYTICS_AUTOCOMPLETE) {
            return self.handle_autocomplete(raw_query);
        }
        match path {
            paths::HEALTH => {
                if self.unhealthy {
                    response(503, json!({ "error": "service unavailable" }))
                } else {
                    response(200, json!({ "status": "ok" }))
                }
            }
            // Exercise every list shape the client must accept: a wrapped
            // object, bare arrays, and a paginated `data` envelope.
            paths::ORGANIZATIONS => response(
                200,
                json!({ "organizations": self.organizations }),
            ),
            paths::ADVERTISERS => response(200, Value::Array(self.advertisers.clone())),
            paths::AFFILIATES => response(200, Value::Array(self.affiliates.clone())),
            paths::CAMPAIGNS => response(200, json!({ "data": self.campaigns })),
            _ => response(404, json!({ "error": "not found" })),
        }
    }

    // Mirrors the real search contract: q of at least 3 characters, optional
    // type filter, domain substring match over the analytics collections.
    fn handle_autocomplete(&self, raw_query: &str) -> ApiResponse {
        let mut q = None;
        let mut kind = None;
        for pair in raw_query.trim_start_matches('?').split('&') {
            match pair.split_once('=') {
                Some(("q", value)) => q = Some(value.to_string()),
                Some(("type", value)) => kind = Some(value.to_string()),
                _ => {}
            }
        }

        let Some(q) = q.filter(|q| q.len() >= 3) else {
            return response(400, json!({ "error": "Invalid request parameters" }));
        };
        let q = q.to_lowercase();

        let mut pools: Vec<(&Vec<Value>, &str)> = Vec::new();
        match kind.as_deref() {
            Some("advertiser") => pools.push((&self.analytics_advertisers, "advertiser")),
            Some("publisher") => pools.push((&self.analytics_affiliates, "publisher")),
            Some("both") | None => {
                pools.push((&self.analytics_advertisers, "advertiser"));
                pools.push((&self.analytics_affiliates, "publisher"));
            }
            Some(other) => {
                return response(
                    400,
                    json!({ "error": format!("invalid organization type: {other}") }),
                );
            }
        }

        let mut data = Vec::new();
        for (pool, kind) in pools {
            for record in pool.iter() {
                let Some(domain) = record.get("domain").and_then(Value::as_str) else {
                    continue;
                };
                if domain.to_lowercase().contains(&q) {
                    data.push(json!({
                        "id": record.get("analytics_id"),
                        "domain": domain,
                        "type": kind,
                        "name": domain,
                    }));
                }
            }
        }

        response(
            200,
            json!({ "message": "Autocompletion results retrieved successfully", "data": data }),
        )
    }

    fn handle_post(&mut self, path: &str, body: &Value) -> ApiResponse {
        *self.write_calls.entry(path.to_string()).or_insert(0) += 1;

        if let Some(script) = self.scripts.get_mut(path).and_then(VecDeque::pop_front) {
            return match script {
                CreateScript::Reject { status, message } => {
                    response(status, json!({ "error": message }))
                }
                CreateScript::RaceConflict => {
                    self.insert(path, body);
                    duplicate_response()
                }
                CreateScript::PhantomConflict => duplicate_response(),
            };
        }

        if path == paths::PROFILES_UPSERT {
            let Some(id) = body.get("id").and_then(Value::as_str).map(str::to_owned) else {
                return response(400, json!({ "error": "id is required" }));
            };
            let status = if self.profiles.contains_key(&id) { 200 } else { 201 };
            self.profiles.insert(id, body.clone());
            return response(status, body.clone());
        }

        let Some((collection, _, unique_fields)) = self.collection(path) else {
            return response(404, json!({ "error": "not found" }));
        };
        let duplicate = collection.iter().any(|existing| {
            unique_fields
                .iter()
                .all(|field| existing.get(*field) == body.get(*field))
        });
        if duplicate {
            return duplicate_response();
        }

        let entity = self.insert(path, body);
        response(201, entity)
    }
}

fn response(status: u16, payload: Value) -> ApiResponse {
    ApiResponse { status, payload }
}

fn duplicate_response() -> ApiResponse {
    response(
        409,
        json!({ "error": "duplicate key value violates unique constraint" }),
    )
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> ApiResponse {
        let mut state = self.state.lock();
        match method {
            Method::GET => state.handle_get(path),
            Method::POST => state.handle_post(path, body.unwrap_or(&Value::Null)),
            _ => response(405, json!({ "error": "method not allowed" })),
        }
    }
}
