// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Toast queue with TTL + dedupe, and its [`NotificationSink`] adapter.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::ports::NotificationSink;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// An action completed.
    Success,
    /// Informational note.
    Info,
    /// Warning that may need attention.
    Warn,
    /// Error requiring user awareness.
    Error,
}

impl Severity {
    /// Default time a toast of this severity stays visible.
    pub fn default_ttl(self) -> Duration {
        match self {
            Severity::Success | Severity::Info => Duration::from_secs(4),
            Severity::Warn => Duration::from_secs(6),
            Severity::Error => Duration::from_secs(10),
        }
    }
}

/// Identifier for a toast entry.
pub type ToastId = u64;

/// Toast data stored in the service.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub severity: Severity,
    /// Short message line.
    pub message: String,
    /// Optional detail text (e.g. the server's error message).
    pub details: Option<String>,
    /// Time-to-live duration.
    pub ttl: Duration,
    /// Creation time.
    pub created: Instant,
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub severity: Severity,
    /// Short message line.
    pub message: String,
    /// Optional detail text.
    pub details: Option<String>,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory toast queue with TTL and dedupe window.
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
    next_id: ToastId,
}

impl ToastService {
    /// Create a new queue with a maximum length.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a toast, deduping identical recent entries (same severity/message/details within `dedupe_window`).
    pub fn push<M, D>(
        &mut self,
        severity: Severity,
        message: M,
        details: D,
        ttl: Duration,
        now: Instant,
    ) -> ToastId
    where
        M: Into<String>,
        D: Into<Option<String>>,
    {
        let message = message.into();
        let details = details.into();

        if let Some(existing) = self.queue.iter_mut().find(|t| {
            t.severity == severity
                && t.message == message
                && t.details == details
                && now.duration_since(t.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() == self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            severity,
            message,
            details,
            ttl,
            created: now,
        });
        id
    }

    /// Remove a toast the user closed. Returns whether it was present.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|t| t.id != id);
        self.queue.len() != before
    }

    /// Drop expired toasts (call once per frame/tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| now.duration_since(t.created) < t.ttl);
    }

    /// Return render-ready toasts with progress ratios.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| now.duration_since(t.created) < t.ttl)
            .map(|t| ToastRender {
                id: t.id,
                severity: t.severity,
                message: t.message.clone(),
                details: t.details.clone(),
                progress: 1.0
                    - (now.duration_since(t.created).as_secs_f32() / t.ttl.as_secs_f32()),
            })
            .collect()
    }

    /// Number of queued toasts (expired ones included until `retain_visible`).
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self::new(8)
    }
}

impl NotificationSink for Mutex<ToastService> {
    fn notify(&self, severity: Severity, message: &str, details: Option<&str>) {
        let mut toasts = self.lock().unwrap_or_else(|e| e.into_inner());
        toasts.push(
            severity,
            message,
            details.map(str::to_owned),
            severity.default_ttl(),
            Instant::now(),
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn identical_pushes_inside_window_are_deduped() {
        let mut toasts = ToastService::new(4);
        let t0 = Instant::now();
        let a = toasts.push(Severity::Error, "boom", None, Duration::from_secs(5), t0);
        let b = toasts.push(
            Severity::Error,
            "boom",
            None,
            Duration::from_secs(5),
            t0 + Duration::from_millis(100),
        );
        assert_eq!(a, b);
        assert_eq!(toasts.len(), 1);

        let c = toasts.push(
            Severity::Error,
            "boom",
            Some("detail".to_string()),
            Duration::from_secs(5),
            t0 + Duration::from_millis(200),
        );
        assert_ne!(a, c);
        assert_eq!(toasts.len(), 2);
    }

    #[test]
    fn queue_is_bounded_and_drops_oldest() {
        let mut toasts = ToastService::new(2);
        let now = Instant::now();
        let first = toasts.push(Severity::Info, "one", None, Duration::from_secs(5), now);
        toasts.push(Severity::Info, "two", None, Duration::from_secs(5), now);
        toasts.push(Severity::Info, "three", None, Duration::from_secs(5), now);
        let ids: Vec<_> = toasts.visible(now).into_iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&first));
    }

    #[test]
    fn expired_toasts_are_hidden_then_dropped() {
        let mut toasts = ToastService::new(4);
        let t0 = Instant::now();
        toasts.push(Severity::Success, "saved", None, Duration::from_secs(1), t0);
        let later = t0 + Duration::from_secs(2);
        assert!(toasts.visible(later).is_empty());
        assert_eq!(toasts.len(), 1);
        toasts.retain_visible(later);
        assert!(toasts.is_empty());
    }

    #[test]
    fn dismiss_removes_by_id() {
        let mut toasts = ToastService::default();
        let id = toasts.push(Severity::Warn, "careful", None, Duration::from_secs(5), Instant::now());
        assert!(toasts.dismiss(id));
        assert!(!toasts.dismiss(id));
    }

    #[test]
    fn mutex_sink_queues_with_severity_ttl() {
        let sink = Mutex::new(ToastService::default());
        sink.notify(Severity::Error, "failed", Some("server said no"));
        let toasts = sink.lock().unwrap();
        let shown = toasts.visible(Instant::now());
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].severity, Severity::Error);
        assert_eq!(shown[0].details.as_deref(), Some("server said no"));
    }
}
