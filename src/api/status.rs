//! Status element

use crate::types::{Identifiable, JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// A post on a timeline.
///
/// Only `id` is interpreted; everything else the server sends is kept
/// verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// Server-assigned identifier
    pub id: String,
    /// Remaining fields, untouched
    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Status {
    /// Create a status with no extra fields
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: JsonObject::new(),
        }
    }

    /// Raw field lookup
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name)
    }

    /// HTML content, if present
    pub fn content(&self) -> Option<&str> {
        self.field("content").and_then(JsonValue::as_str)
    }

    /// Creation timestamp as sent by the server
    pub fn created_at(&self) -> Option<&str> {
        self.field("created_at").and_then(JsonValue::as_str)
    }

    /// `acct` of the author
    pub fn account(&self) -> Option<&str> {
        self.field("account")
            .and_then(|a| a.get("acct"))
            .and_then(JsonValue::as_str)
    }
}

impl Identifiable for Status {
    type Id = String;

    fn id(&self) -> &String {
        &self.id
    }
}
