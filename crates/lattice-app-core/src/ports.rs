// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port traits that let flows talk to the UI layer without depending on it.

use crate::toast::Severity;

/// Sink for user-visible notifications (toasts, status lines, etc.).
pub trait NotificationSink {
    /// Surface a message with optional detail text.
    fn notify(&self, severity: Severity, message: &str, details: Option<&str>);
}

/// Minimal refresh port; implementations re-run whatever queries back the
/// dependent views. Expected to be cheap/best-effort.
pub trait RefreshPort {
    /// Request that dependent views re-query their data.
    fn request_refresh(&self);
}

impl<F> RefreshPort for F
where
    F: Fn(),
{
    fn request_refresh(&self) {
        self()
    }
}
