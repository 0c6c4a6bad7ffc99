// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Branch + as-of-time scoping attached to every query and mutation.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use lattice_app_core::{ClientConfig, SessionPrefs};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Error parsing a [`Timestamp`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    /// Neither RFC 3339 nor a relative offset such as `"5m"`.
    #[error("invalid time format for {0:?}")]
    Invalid(String),
}

/// Relative offsets accepted in place of an absolute time (`"30s"`, `"5min"`, `"2h"`).
static RELATIVE_UNITS: LazyLock<[(Regex, i64); 3]> = LazyLock::new(|| {
    let unit = |pattern: &str, seconds: i64| match Regex::new(pattern) {
        Ok(re) => (re, seconds),
        Err(err) => unreachable!("static pattern {pattern:?} failed to compile: {err}"),
    };
    [
        unit(r"(\d+)(s|sec|second|seconds)\b", 1),
        unit(r"(\d+)(m|min|minute|minutes)\b", 60),
        unit(r"(\d+)(h|hour|hours)\b", 3600),
    ]
});

/// UTC instant used to read or write data as of a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap an existing instant.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Parse RFC 3339, or a relative offset subtracted from `now`.
    pub fn parse_relative_to(value: &str, now: DateTime<Utc>) -> Result<Self, TimestampError> {
        let value = value.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(parsed.with_timezone(&Utc)));
        }

        let mut offset = 0i64;
        let mut matched = false;
        for (re, unit_seconds) in RELATIVE_UNITS.iter() {
            if let Some(caps) = re.captures(value) {
                let amount: i64 = caps[1]
                    .parse()
                    .map_err(|_| TimestampError::Invalid(value.to_string()))?;
                offset = amount
                    .checked_mul(*unit_seconds)
                    .and_then(|s| offset.checked_add(s))
                    .ok_or_else(|| TimestampError::Invalid(value.to_string()))?;
                matched = true;
            }
        }
        if !matched {
            return Err(TimestampError::Invalid(value.to_string()));
        }
        let delta = Duration::try_seconds(offset)
            .ok_or_else(|| TimestampError::Invalid(value.to_string()))?;
        now.checked_sub_signed(delta)
            .map(Self)
            .ok_or_else(|| TimestampError::Invalid(value.to_string()))
    }

    /// Underlying instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 with a `Z` suffix, as sent on the wire.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_relative_to(s, Utc::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

/// Scope applied to every call: the branch under edit and an optional as-of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationContext {
    /// Branch name.
    pub branch: String,
    /// As-of time; `None` means "latest".
    pub at: Option<Timestamp>,
}

impl MutationContext {
    /// Context for the latest state of `branch`.
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            at: None,
        }
    }

    /// Pin the context to `at`.
    pub fn at(mut self, at: Timestamp) -> Self {
        self.at = Some(at);
        self
    }

    /// Build the context from the saved session selection, falling back to
    /// the configured default branch.
    pub fn from_prefs(prefs: &SessionPrefs, config: &ClientConfig) -> Result<Self, TimestampError> {
        let at = prefs
            .at
            .as_deref()
            .map(str::parse::<Timestamp>)
            .transpose()?;
        Ok(Self {
            branch: prefs.branch_or(&config.default_branch).to_string(),
            at,
        })
    }
}
