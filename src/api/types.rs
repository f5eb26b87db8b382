//! Wire types for the platform API.
//!
//! Identifiers are opaque handles assigned by the server: integers for most
//! entities, the caller-supplied UUID for profiles. [`EntityId`] covers both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Server-assigned entity identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Number(i64),
    Text(String),
}

impl EntityId {
    /// Read an identifier out of a JSON field, if it carries one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(EntityId::Number),
            Value::String(s) => Some(EntityId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{n}"),
            EntityId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Number(n)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId::Text(id.to_string())
    }
}

/// Organization type. Must match on an existing organization for the
/// idempotent resolution to count it as the same entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    PlatformOwner,
    Advertiser,
    Affiliate,
}

impl OrgType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrgType::PlatformOwner => "platform_owner",
            OrgType::Advertiser => "advertiser",
            OrgType::Affiliate => "affiliate",
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub organization_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub org_type: OrgType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Advertiser {
    pub advertiser_id: i64,
    pub name: String,
    pub organization_id: i64,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Affiliate {
    pub affiliate_id: i64,
    pub name: String,
    pub organization_id: i64,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Campaign {
    pub campaign_id: i64,
    pub name: String,
    pub advertiser_id: i64,
    pub organization_id: i64,
    #[serde(default)]
    pub payout_type: Option<String>,
    #[serde(default)]
    pub payout_amount: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One row of an analytics autocomplete search. The display name is the
/// record's domain.
#[derive(Debug, Clone, Deserialize)]
pub struct AutocompleteResult {
    pub name: String,
}

/// Pull the entity array out of a list response.
///
/// List endpoints return either a bare array or an object wrapping the array
/// under the collection's own field name or `data`. Any other shape counts
/// as an empty listing, matching the server's paginated-response variants.
pub fn extract_list(payload: &Value, wrapper: &str) -> Vec<Value> {
    match payload {
        Value::Array(items) => items.clone(),
        Value::Object(map) => map
            .get(wrapper)
            .or_else(|| map.get("data"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_list_accepts_bare_array() {
        let payload = json!([{"name": "Acme"}]);
        assert_eq!(extract_list(&payload, "organizations").len(), 1);
    }

    #[test]
    fn extract_list_accepts_named_wrapper() {
        let payload = json!({"organizations": [{"name": "Acme"}, {"name": "Globex"}]});
        assert_eq!(extract_list(&payload, "organizations").len(), 2);
    }

    #[test]
    fn extract_list_accepts_data_wrapper() {
        let payload = json!({"data": [{"name": "Acme"}]});
        assert_eq!(extract_list(&payload, "organizations").len(), 1);
    }

    #[test]
    fn extract_list_treats_unknown_shape_as_empty() {
        assert!(extract_list(&json!({"total": 0}), "organizations").is_empty());
        assert!(extract_list(&json!("nope"), "organizations").is_empty());
    }

    #[test]
    fn entity_id_from_value() {
        assert_eq!(EntityId::from_value(&json!(7)), Some(EntityId::Number(7)));
        assert_eq!(
            EntityId::from_value(&json!("abc")),
            Some(EntityId::Text("abc".into()))
        );
        assert_eq!(EntityId::from_value(&json!(null)), None);
    }

    #[test]
    fn org_type_serializes_snake_case() {
        assert_eq!(json!(OrgType::PlatformOwner), json!("platform_owner"));
        assert_eq!(json!(OrgType::Advertiser), json!("advertiser"));
    }
}
