// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Branch-scoped GraphQL transport for Lattice tools.
//!
//! - [`context`]: the branch/as-of-time scope every call carries.
//! - [`request`], [`literal`], [`document`]: building generic
//!   create/update/delete documents.
//! - [`endpoint`]: the [`MutationEndpoint`] port flows are written against.
//! - [`client`]: the reqwest-backed HTTP implementation.

pub mod client;
pub mod context;
pub mod document;
pub mod endpoint;
pub mod literal;
pub mod request;

pub use client::GraphqlClient;
pub use context::{MutationContext, Timestamp, TimestampError};
pub use endpoint::{MutationEndpoint, MutationError};
pub use literal::{encode_literal, LiteralError};
pub use request::{MutationRequest, ObjectId};
