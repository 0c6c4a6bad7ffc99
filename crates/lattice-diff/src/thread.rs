// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Labels and titles for conversation threads attached to diff nodes.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::classify::BadgeTone;

/// Path segments never shown in a thread label.
pub const NODE_PATH_EXCLUDELIST: &[&str] = &["property"];

/// Number of leading path segments (`data/<node-uuid>`) dropped from labels.
const PATH_PREFIX_SEGMENTS: usize = 2;

/// Title used for threads that are not attached to a specific object.
pub const GENERIC_THREAD_TITLE: &str = "Conversation";

/// Diff node as far as thread labelling is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DiffNode {
    /// Node id.
    #[serde(default)]
    pub id: Option<String>,
    /// Display label per branch name.
    #[serde(default)]
    pub display_label: BTreeMap<String, String>,
}

/// Build a `"object > segment > segment"` label for a thread anchored at
/// `path` on `node`, as seen from `branch`.
pub fn thread_label(node: Option<&DiffNode>, branch: Option<&str>, path: Option<&str>) -> Option<String> {
    let object_name = match (node, branch) {
        (Some(node), Some(branch)) => node
            .display_label
            .get(branch)
            .map(String::as_str)
            .filter(|l| !l.is_empty()),
        _ => None,
    };

    let node_label = path.map(|path| {
        path.split('/')
            .skip(PATH_PREFIX_SEGMENTS)
            .filter(|segment| !NODE_PATH_EXCLUDELIST.contains(segment))
            .filter(|segment| !segment.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" > ")
            .trim()
            .to_string()
    });

    match (object_name, node_label) {
        (Some(obj), Some(label)) if !label.is_empty() => Some(format!("{obj} > {label}")),
        (Some(obj), _) => Some(obj.to_string()),
        (None, label) => label,
    }
}

/// Thread record as returned by the thread queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ThreadSummary {
    /// Thread id.
    #[serde(default)]
    pub id: Option<String>,
    /// `label.value` attribute.
    #[serde(default, deserialize_with = "attribute_value")]
    pub label: Option<String>,
    /// Server display label.
    #[serde(default)]
    pub display_label: Option<String>,
}

fn attribute_value<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Attribute {
        value: Option<String>,
    }
    Ok(Option::<Attribute>::deserialize(de)?.and_then(|a| a.value))
}

/// Title badge for a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadTitle {
    /// Title text.
    pub text: String,
    /// Neutral for generic conversations, green for object threads.
    pub tone: BadgeTone,
}

/// Pick a thread title: the thread's label, then its display label, then
/// `fallback`. Returns `None` when the chosen text is empty.
pub fn thread_title(thread: Option<&ThreadSummary>, fallback: Option<&str>) -> Option<ThreadTitle> {
    let text = thread
        .and_then(|t| t.label.as_deref().or(t.display_label.as_deref()))
        .or(fallback)
        .filter(|t| !t.is_empty())?;
    let tone = if text == GENERIC_THREAD_TITLE {
        BadgeTone::Neutral
    } else {
        BadgeTone::Green
    };
    Some(ThreadTitle {
        text: text.to_string(),
        tone,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn node() -> DiffNode {
        DiffNode {
            id: Some("n1".into()),
            display_label: BTreeMap::from([("feature".to_string(), "edge-router-01".to_string())]),
        }
    }

    #[test]
    fn label_drops_prefix_and_excluded_segments() {
        let label = thread_label(
            Some(&node()),
            Some("feature"),
            Some("data/1799f3c5-8e2d-4a1b/name/property/HAS_VALUE"),
        );
        assert_eq!(label.as_deref(), Some("edge-router-01 > name > HAS_VALUE"));
    }

    #[test]
    fn label_without_branch_match_uses_path_only() {
        let label = thread_label(Some(&node()), Some("main"), Some("data/abc/description"));
        assert_eq!(label.as_deref(), Some("description"));
        assert_eq!(thread_label(None, None, None), None);
    }

    #[test]
    fn label_with_object_but_no_path_is_object_name() {
        let label = thread_label(Some(&node()), Some("feature"), Some("data/abc"));
        assert_eq!(label.as_deref(), Some("edge-router-01"));
    }

    #[test]
    fn title_precedence_and_tone() {
        let thread: ThreadSummary = serde_json::from_str(
            r#"{"id":"t1","label":{"value":"Conversation"},"display_label":"ignored"}"#,
        )
        .unwrap();
        let title = thread_title(Some(&thread), Some("fallback")).unwrap();
        assert_eq!(title.text, "Conversation");
        assert_eq!(title.tone, BadgeTone::Neutral);

        let unlabeled = ThreadSummary {
            display_label: Some("name".into()),
            ..ThreadSummary::default()
        };
        let title = thread_title(Some(&unlabeled), None).unwrap();
        assert_eq!(title.text, "name");
        assert_eq!(title.tone, BadgeTone::Green);

        assert_eq!(thread_title(None, Some("edge-router-01 > name")).unwrap().text, "edge-router-01 > name");
        assert_eq!(thread_title(None, None), None);
        assert_eq!(thread_title(None, Some("")), None);
    }
}
