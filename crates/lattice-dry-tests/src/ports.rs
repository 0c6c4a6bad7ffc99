// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording fakes for the notification and refresh ports.

use lattice_app_core::{NotificationSink, RefreshPort, Severity};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One notification captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity as sent.
    pub severity: Severity,
    /// Headline.
    pub message: String,
    /// Optional detail text.
    pub details: Option<String>,
}

/// Notification sink that keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Total notifications received.
    pub fn count(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Notifications received with `severity`.
    pub fn count_of(&self, severity: Severity) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|n| n.severity == severity)
            .count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, severity: Severity, message: &str, details: Option<&str>) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                severity,
                message: message.to_string(),
                details: details.map(str::to_owned),
            });
    }
}

/// Refresh port that only counts requests.
#[derive(Default)]
pub struct CountingRefresh {
    hits: AtomicUsize,
}

impl CountingRefresh {
    /// Counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Refreshes requested so far.
    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl RefreshPort for CountingRefresh {
    fn request_refresh(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}
