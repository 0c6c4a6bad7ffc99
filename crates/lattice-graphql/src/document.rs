// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GraphQL documents for the generic `<Kind>Create` / `<Kind>Update` /
//! `<Kind>Delete` mutations, and where their results live in the response.

use serde_json::{json, Value as Json};

use crate::literal::{encode_literal, is_name, LiteralError};
use crate::request::{MutationRequest, ObjectId};

/// Which generic mutation a document performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `<Kind>Create`.
    Create,
    /// `<Kind>Update`.
    Update,
    /// `<Kind>Delete`.
    Delete,
}

impl Operation {
    fn suffix(self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }
}

/// Response field holding the result of `op` on `kind` (e.g. `CoreChangeThreadCreate`).
pub fn result_field(kind: &str, op: Operation) -> String {
    format!("{kind}{}", op.suffix())
}

fn checked_kind(kind: &str) -> Result<&str, LiteralError> {
    if is_name(kind) {
        Ok(kind)
    } else {
        Err(LiteralError::InvalidName(kind.to_string()))
    }
}

/// `mutation { <Kind>Create(data: {...}) { ok object { id } } }`
pub fn create_object(request: &MutationRequest) -> Result<String, LiteralError> {
    let kind = checked_kind(&request.kind)?;
    let data = encode_literal(&request.to_input())?;
    Ok(format!(
        "mutation {{\n  {field}(data: {data}) {{\n    ok\n    object {{\n      id\n    }}\n  }}\n}}\n",
        field = result_field(kind, Operation::Create),
    ))
}

/// `mutation { <Kind>Update(data: {id: ..., ...}) { ok } }`
pub fn update_object(id: &ObjectId, request: &MutationRequest) -> Result<String, LiteralError> {
    let kind = checked_kind(&request.kind)?;
    let mut input = request.to_input();
    if let Json::Object(map) = &mut input {
        map.insert("id".to_string(), json!(id.as_str()));
    }
    let data = encode_literal(&input)?;
    Ok(format!(
        "mutation {{\n  {field}(data: {data}) {{\n    ok\n  }}\n}}\n",
        field = result_field(kind, Operation::Update),
    ))
}

/// `mutation { <Kind>Delete(data: {id: "..."}) { ok } }`
pub fn delete_object(kind: &str, id: &ObjectId) -> Result<String, LiteralError> {
    let kind = checked_kind(kind)?;
    let data = encode_literal(&json!({ "id": id.as_str() }))?;
    Ok(format!(
        "mutation {{\n  {field}(data: {data}) {{\n    ok\n  }}\n}}\n",
        field = result_field(kind, Operation::Delete),
    ))
}

/// Pull `data.<Kind>Create.object.id` out of a create response.
pub fn created_id(data: &Json, kind: &str) -> Option<ObjectId> {
    data.get(result_field(kind, Operation::Create))?
        .get("object")?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
        .map(ObjectId::new)
}

/// Read the `ok` flag of an update/delete response; absent counts as success.
pub fn reported_ok(data: &Json, kind: &str, op: Operation) -> bool {
    data.get(result_field(kind, op))
        .and_then(|r| r.get("ok"))
        .and_then(Json::as_bool)
        .unwrap_or(true)
}
