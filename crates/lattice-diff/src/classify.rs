// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Maps a [`PropertyChange`] to the values a UI must render.
//!
//! `added` shows only the new value, `removed` only the previous one, and
//! `updated`/`conflict` show previous then new. The order carries the
//! direction of the change.

use serde::Serialize;

use crate::change::{Action, PropertyChange};
use crate::value::{display_value, kind_descriptor, KindDescriptor, Value};

/// Colour family a renderer uses for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    /// No emphasis.
    Neutral,
    /// Additions.
    Green,
    /// Removals.
    Red,
    /// Updates and conflicts.
    Blue,
}

/// Which side of the change a displayed value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// `value.previous`.
    Previous,
    /// `value.new`.
    New,
}

/// One value ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedValue {
    /// Origin side.
    pub side: Side,
    /// Resolved text.
    pub text: String,
    /// Present only when the value carries a kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<KindDescriptor>,
}

impl DisplayedValue {
    fn resolve(side: Side, value: Option<&Value>) -> Self {
        Self {
            side,
            text: display_value(value),
            kind: kind_descriptor(value),
        }
    }
}

/// Classifier output for one change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffDisplay {
    /// Action the display was built for.
    pub action: Action,
    /// Badge colour for every value.
    pub tone: BadgeTone,
    /// Values in render order.
    pub values: Vec<DisplayedValue>,
}

impl DiffDisplay {
    /// True when two values are shown and a renderer should draw a
    /// previous → new marker between them.
    pub fn is_transition(&self) -> bool {
        self.values.len() == 2
    }

    /// Plain-text rendering, e.g. `"10.0.0.1 → 10.0.0.2"`.
    pub fn to_text(&self) -> String {
        self.values
            .iter()
            .map(|v| v.text.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Badge tone used for every value of `action`.
pub fn tone_for(action: Action) -> BadgeTone {
    match action {
        Action::Added => BadgeTone::Green,
        Action::Removed => BadgeTone::Red,
        // conflict deliberately shares the update shape and colour
        Action::Updated | Action::Conflict => BadgeTone::Blue,
    }
}

/// Badge tone for a loosely-typed action label (e.g. a node-level summary).
///
/// Only `added`, `updated` and `removed` have a tone; anything else,
/// `conflict` included, yields `None`.
pub fn badge_tone_for(action: Option<&str>) -> Option<BadgeTone> {
    match action? {
        "added" => Some(BadgeTone::Green),
        "updated" => Some(BadgeTone::Blue),
        "removed" => Some(BadgeTone::Red),
        _ => None,
    }
}

/// Select and resolve the values to display for `change`.
pub fn classify(change: &PropertyChange) -> DiffDisplay {
    let previous = change.value.previous.as_ref();
    let new = change.value.new.as_ref();
    let values = match change.action {
        Action::Added => vec![DisplayedValue::resolve(Side::New, new)],
        Action::Removed => vec![DisplayedValue::resolve(Side::Previous, previous)],
        Action::Updated | Action::Conflict => vec![
            DisplayedValue::resolve(Side::Previous, previous),
            DisplayedValue::resolve(Side::New, new),
        ],
    };
    DiffDisplay {
        action: change.action,
        tone: tone_for(change.action),
        values,
    }
}
