// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Lattice tools (client config, session
//! prefs, toasts) and the ports flows use to reach the UI layer.
//! Keeps UI/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod ports;
pub mod prefs;
pub mod toast;

pub use config::{ClientConfig, ConfigError, ConfigService, ConfigStore};
pub use ports::{NotificationSink, RefreshPort};
pub use prefs::SessionPrefs;
pub use toast::{Severity, ToastService};
