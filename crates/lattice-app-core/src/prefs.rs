// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-user session preferences: which branch is under edit and the optional
//! as-of time used to scope every query and mutation.

use serde::{Deserialize, Serialize};

/// Key under which [`SessionPrefs`] is persisted.
pub const SESSION_PREFS_KEY: &str = "session";

/// Saved branch/time selection for a tool session.
///
/// Callers turn this into an explicit request context; nothing reads it
/// implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionPrefs {
    /// Selected branch; `None` means the configured default branch.
    pub branch: Option<String>,
    /// Selected as-of time (RFC 3339 or relative form such as `"5m"`).
    pub at: Option<String>,
}

impl SessionPrefs {
    /// Branch to use, falling back to `default_branch` when unset or blank.
    pub fn branch_or<'a>(&'a self, default_branch: &'a str) -> &'a str {
        match self.branch.as_deref() {
            Some(b) if !b.trim().is_empty() => b,
            _ => default_branch,
        }
    }

    /// Select a branch; clears any as-of time since it belonged to the old branch.
    pub fn select_branch(&mut self, branch: impl Into<String>) {
        self.branch = Some(branch.into());
        self.at = None;
    }

    /// Pin (or unpin with `None`) the as-of time.
    pub fn set_at(&mut self, at: Option<String>) {
        self.at = at.filter(|v| !v.trim().is_empty());
    }
}
