// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared test doubles and fixtures for Lattice crates.
//!
//! - [`InMemoryConfigStore`]: config persistence without the filesystem.
//! - [`ScriptedEndpoint`]: a mutation endpoint with queued results and a call log.
//! - [`RecordingSink`] / [`CountingRefresh`]: observe notifications and refreshes.
//! - [`fixtures`]: canned diff payloads.

pub mod config;
pub mod endpoint;
pub mod fixtures;
pub mod ports;

pub use config::InMemoryConfigStore;
pub use endpoint::{EndpointCall, ScriptedEndpoint};
pub use ports::{CountingRefresh, Notification, RecordingSink};
