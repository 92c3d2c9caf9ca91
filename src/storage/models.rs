use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names owned by the record itself; never stored as extra fields.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "slug",
    "target",
    "createdAt",
    "updatedAt",
    "expiration",
];

/// A stored short link, serialized as JSON under `link:<slug>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: String,
    pub slug: String,
    pub target: String,
    /// Epoch seconds, fixed at creation
    pub created_at: i64,
    /// Epoch seconds of the last successful write
    pub updated_at: i64,
    /// Epoch seconds; `None` never expires
    #[serde(default)]
    pub expiration: Option<i64>,
    /// User supplied fields (comment, title, ...) preserved across edits
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Drop reserved keys from a flattened field map.
pub fn strip_reserved(mut fields: Map<String, Value>) -> Map<String, Value> {
    fields.retain(|key, _| !RESERVED_FIELDS.contains(&key.as_str()));
    fields
}
