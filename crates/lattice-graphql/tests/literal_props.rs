// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property tests for the GraphQL literal encoder.
#![allow(clippy::unwrap_used)]

use lattice_graphql::encode_literal;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_][a-z0-9_]{0,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Walk the literal outside string tokens and check bracket balance.
fn balanced(lit: &str) -> bool {
    let mut depth: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in lit.chars() {
        if in_string {
            match (escaped, c) {
                (true, _) => escaped = false,
                (false, '\\') => escaped = true,
                (false, '"') => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth.push(c),
            '}' => {
                if depth.pop() != Some('{') {
                    return false;
                }
            }
            ']' => {
                if depth.pop() != Some('[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth.is_empty() && !in_string
}

proptest! {
    #[test]
    fn encoded_literals_are_balanced(value in json()) {
        let lit = encode_literal(&value).unwrap();
        prop_assert!(balanced(&lit), "unbalanced literal: {}", lit);
    }

    #[test]
    fn strings_never_leak_raw_newlines(s in any::<String>()) {
        let lit = encode_literal(&Value::String(s)).unwrap();
        prop_assert!(!lit.contains('\n'));
        prop_assert!(lit.starts_with('"') && lit.ends_with('"'));
    }
}
