// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Entity creation/update requests and server-assigned identifiers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier the server assigns to a created object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap a raw id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// One entity mutation: the schema kind plus its input fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationRequest {
    /// Schema kind (e.g. `CoreChangeThread`).
    pub kind: String,
    /// Input fields, already shaped the way the schema expects
    /// (`{"name": {"value": ...}}`, `{"thread": {"id": ...}}`).
    pub fields: BTreeMap<String, Json>,
}

impl MutationRequest {
    /// Empty request for `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a raw field.
    pub fn field(mut self, name: impl Into<String>, value: Json) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Set an attribute field: `name: {value: ...}`.
    pub fn attribute(self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.field(name, serde_json::json!({ "value": value.into() }))
    }

    /// Set a single-peer relationship: `name: {id: ...}`.
    pub fn relation(self, name: impl Into<String>, id: &ObjectId) -> Self {
        self.field(name, serde_json::json!({ "id": id.as_str() }))
    }

    /// Set a multi-peer relationship: `name: [{id: ...}, ...]`.
    pub fn relations<'a, I>(self, name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = &'a ObjectId>,
    {
        let peers = ids
            .into_iter()
            .map(|id| serde_json::json!({ "id": id.as_str() }))
            .collect();
        self.field(name, Json::Array(peers))
    }

    /// Fields as a JSON object (input to the literal encoder).
    pub fn to_input(&self) -> Json {
        Json::Object(
            self.fields
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Map<_, _>>(),
        )
    }
}
