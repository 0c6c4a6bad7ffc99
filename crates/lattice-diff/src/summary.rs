// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-action change counts.

use serde::{Deserialize, Serialize};

use crate::change::{Action, PropertyChange};

/// Count of changes per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    /// `added` changes.
    pub added: usize,
    /// `removed` changes.
    pub removed: usize,
    /// `updated` changes.
    pub updated: usize,
    /// `conflict` changes.
    pub conflict: usize,
}

impl DiffSummary {
    /// Tally a set of changes.
    pub fn tally<'a, I>(changes: I) -> Self
    where
        I: IntoIterator<Item = &'a PropertyChange>,
    {
        let mut summary = Self::default();
        for change in changes {
            summary.record(change.action);
        }
        summary
    }

    /// Count one more change of `action`.
    pub fn record(&mut self, action: Action) {
        let slot = match action {
            Action::Added => &mut self.added,
            Action::Removed => &mut self.removed,
            Action::Updated => &mut self.updated,
            Action::Conflict => &mut self.conflict,
        };
        *slot += 1;
    }

    /// Total number of changes.
    pub fn total(&self) -> usize {
        self.added + self.removed + self.updated + self.conflict
    }

    /// True when any change conflicts.
    pub fn has_conflicts(&self) -> bool {
        self.conflict > 0
    }
}
