// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Branch diff classification for Lattice tools.
//!
//! Pure data and pure functions: given property changes between two branch
//! states, decide which values to show, in which order, and how to label them.
//! Nothing here performs I/O.

pub mod change;
pub mod classify;
pub mod summary;
pub mod thread;
pub mod value;

pub use change::{Action, PropertyChange, UnknownAction, ValueChange};
pub use classify::{badge_tone_for, classify, tone_for, BadgeTone, DiffDisplay, DisplayedValue, Side};
pub use summary::DiffSummary;
pub use thread::{thread_label, thread_title, DiffNode, ThreadSummary, ThreadTitle};
pub use value::{display_value, kind_descriptor, KindDescriptor, Scalar, Value};
