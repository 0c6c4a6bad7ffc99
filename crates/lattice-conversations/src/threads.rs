// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Existing threads anchored at an object path.

use lattice_graphql::literal::{encode_literal, is_name, LiteralError};
use lattice_graphql::{MutationError, ObjectId};
use serde::Deserialize;
use serde_json::{json, Value as Json};

/// Query counting `kind` threads of `change_id` anchored at `object_path`.
pub fn object_threads_query(
    kind: &str,
    change_id: &ObjectId,
    object_path: &str,
) -> Result<String, LiteralError> {
    if !is_name(kind) {
        return Err(LiteralError::InvalidName(kind.to_string()));
    }
    let change = encode_literal(&json!(change_id.as_str()))?;
    let path = encode_literal(&json!(object_path))?;
    Ok(format!(
        "query {{\n  {kind}(change__ids: {change}, object_path__value: {path}) {{\n    count\n    edges {{\n      node {{\n        id\n        comments {{\n          count\n        }}\n      }}\n    }}\n  }}\n}}\n"
    ))
}

/// One thread and how many comments it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadComments {
    /// Thread id.
    pub id: ObjectId,
    /// Comment count.
    pub comments: usize,
}

/// Threads returned by [`object_threads_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectThreads {
    /// Server-side total.
    pub count: usize,
    /// Threads on this page.
    pub threads: Vec<ThreadComments>,
}

#[derive(Deserialize)]
struct Connection {
    #[serde(default)]
    count: usize,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Deserialize)]
struct Edge {
    node: Node,
}

#[derive(Deserialize)]
struct Node {
    id: ObjectId,
    #[serde(default)]
    comments: Option<Count>,
}

#[derive(Deserialize)]
struct Count {
    #[serde(default)]
    count: usize,
}

impl ObjectThreads {
    /// Read `data.<kind>` from a query response.
    pub fn from_response(data: &Json, kind: &str) -> Result<Self, MutationError> {
        let Some(connection) = data.get(kind) else {
            return Err(MutationError::Decode(format!("response has no {kind} field")));
        };
        let connection = Connection::deserialize(connection)
            .map_err(|err| MutationError::Decode(err.to_string()))?;
        Ok(Self {
            count: connection.count,
            threads: connection
                .edges
                .into_iter()
                .map(|edge| ThreadComments {
                    id: edge.node.id,
                    comments: edge.node.comments.map_or(0, |c| c.count),
                })
                .collect(),
        })
    }

    /// Whether any thread exists for the object.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Comments across all returned threads.
    pub fn total_comments(&self) -> usize {
        self.threads.iter().map(|t| t.comments).sum()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn query_escapes_arguments() {
        let doc = object_threads_query(
            "CoreObjectThread",
            &ObjectId::new("pc-1"),
            "data/n1/name/\"quoted\"",
        )
        .unwrap();
        assert!(doc.starts_with(
            "query {\n  CoreObjectThread(change__ids: \"pc-1\", object_path__value: \"data/n1/name/\\\"quoted\\\"\")"
        ));
        assert!(doc.contains("comments {\n          count"));
    }

    #[test]
    fn query_rejects_bad_kind() {
        assert!(object_threads_query("Core Thread", &ObjectId::new("x"), "p").is_err());
    }

    #[test]
    fn response_is_parsed() {
        let data = json!({
            "CoreObjectThread": {
                "count": 2,
                "edges": [
                    {"node": {"id": "t1", "comments": {"count": 3}}},
                    {"node": {"id": "t2"}}
                ]
            }
        });
        let threads = ObjectThreads::from_response(&data, "CoreObjectThread").unwrap();
        assert_eq!(threads.count, 2);
        assert_eq!(threads.total_comments(), 3);
        assert_eq!(threads.threads[1], ThreadComments { id: ObjectId::new("t2"), comments: 0 });
        assert!(!threads.is_empty());
    }

    #[test]
    fn missing_field_is_decode_error() {
        let err = ObjectThreads::from_response(&json!({}), "CoreObjectThread").unwrap_err();
        assert!(matches!(err, MutationError::Decode(_)));
    }
}
