// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property change records as reported by the branch diff API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::value::Value;

/// What happened to a property between two branch states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Present only on the new side.
    Added,
    /// Present only on the previous side.
    Removed,
    /// Changed from previous to new.
    Updated,
    /// Changed concurrently on both branches.
    Conflict,
}

impl Action {
    /// Every action, in display order.
    pub const ALL: [Action; 4] = [
        Action::Added,
        Action::Removed,
        Action::Updated,
        Action::Conflict,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Added => "added",
            Action::Removed => "removed",
            Action::Updated => "updated",
            Action::Conflict => "conflict",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when an action string is not one of the four known kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown diff action {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// The two sides of a change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValueChange {
    /// Value before the change.
    #[serde(default)]
    pub previous: Option<Value>,
    /// Value after the change.
    #[serde(default)]
    pub new: Option<Value>,
}

/// A single property change tagged with its action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Change classification.
    pub action: Action,
    /// Previous/new values.
    #[serde(default)]
    pub value: ValueChange,
    /// Branch the change was observed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Property type (e.g. `HAS_VALUE`, `IS_PROTECTED`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    /// Server timestamp of the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed_at: Option<String>,
}

impl PropertyChange {
    /// Change with just an action and its two sides.
    pub fn new(action: Action, previous: Option<Value>, new: Option<Value>) -> Self {
        Self {
            action,
            value: ValueChange { previous, new },
            branch: None,
            property_type: None,
            changed_at: None,
        }
    }

    /// Whether the sides present match what the action implies
    /// (`added` has new, `removed` has previous, the rest have both).
    pub fn is_well_formed(&self) -> bool {
        let prev = self.value.previous.is_some();
        let new = self.value.new.is_some();
        match self.action {
            Action::Added => new,
            Action::Removed => prev,
            Action::Updated | Action::Conflict => prev && new,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn action_parses_known_names_only() {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>(), Ok(action));
        }
        assert_eq!(
            "unchanged".parse::<Action>(),
            Err(UnknownAction("unchanged".into()))
        );
        assert!("Added".parse::<Action>().is_err());
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<9}|", Action::Added), "added    |");
        assert_eq!(format!("{:>8}", Action::Removed), " removed");
        assert_eq!(Action::Conflict.to_string(), "conflict");
    }

    #[test]
    fn unknown_action_fails_deserialization() {
        let raw = r#"{"action":"moved","value":{"new":"x"}}"#;
        assert!(serde_json::from_str::<PropertyChange>(raw).is_err());
    }

    #[test]
    fn server_payload_deserializes() {
        let raw = r#"{
            "branch": "feature",
            "type": "HAS_VALUE",
            "changed_at": "2024-03-01T10:00:00Z",
            "action": "updated",
            "value": {"previous": "10.0.0.0/24", "new": null}
        }"#;
        let change: PropertyChange = serde_json::from_str(raw).unwrap();
        assert_eq!(change.action, Action::Updated);
        assert_eq!(change.property_type.as_deref(), Some("HAS_VALUE"));
        assert!(change.value.new.is_none());
        assert!(!change.is_well_formed());
    }

    #[test]
    fn well_formedness_follows_action() {
        let v = || Some(Value::scalar("x"));
        assert!(PropertyChange::new(Action::Added, None, v()).is_well_formed());
        assert!(!PropertyChange::new(Action::Added, v(), None).is_well_formed());
        assert!(PropertyChange::new(Action::Removed, v(), None).is_well_formed());
        assert!(PropertyChange::new(Action::Conflict, v(), v()).is_well_formed());
        assert!(!PropertyChange::new(Action::Updated, None, v()).is_well_formed());
    }
}
