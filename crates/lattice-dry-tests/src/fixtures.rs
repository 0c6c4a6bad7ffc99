// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canned branch-diff payloads.

use lattice_diff::{Action, PropertyChange, Value};

/// A change list covering every action, in the server's wire shape.
pub const BRANCH_DIFF_JSON: &str = r#"[
  {
    "branch": "feature-ipam",
    "type": "HAS_VALUE",
    "changed_at": "2024-05-01T09:30:00Z",
    "action": "added",
    "value": {"previous": null, "new": "10.1.0.0/16"}
  },
  {
    "branch": "feature-ipam",
    "type": "HAS_VALUE",
    "action": "removed",
    "value": {"previous": {"id": "tag-1", "kind": "BuiltinTag", "display_label": "blue"}, "new": null}
  },
  {
    "branch": "feature-ipam",
    "type": "IS_PROTECTED",
    "action": "updated",
    "value": {"previous": false, "new": true}
  },
  {
    "branch": "main",
    "type": "HAS_VALUE",
    "action": "conflict",
    "value": {"previous": "NULL", "new": "edge-router-02"}
  }
]"#;

/// Typed form of [`BRANCH_DIFF_JSON`].
pub fn branch_diff() -> Vec<PropertyChange> {
    vec![
        PropertyChange::new(Action::Added, None, Some(Value::scalar("10.1.0.0/16"))),
        PropertyChange::new(
            Action::Removed,
            Some(Value::peer("tag-1", "BuiltinTag", "blue")),
            None,
        ),
        PropertyChange::new(
            Action::Updated,
            Some(Value::scalar(false)),
            Some(Value::scalar(true)),
        ),
        PropertyChange::new(
            Action::Conflict,
            Some(Value::scalar("NULL")),
            Some(Value::scalar("edge-router-02")),
        ),
    ]
}

/// Prefix update where the previous side is a peer and the new side a bare value.
pub fn prefix_update() -> PropertyChange {
    PropertyChange::new(
        Action::Updated,
        Some(Value::peer("pfx-1", "IpamIPPrefix", "10.0.0.0/24")),
        Some(Value::scalar("10.0.1.0/24")),
    )
}
