// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The mutation endpoint port and its error type.

use async_trait::async_trait;
use serde_json::Value as Json;
use thiserror::Error;

use crate::context::MutationContext;
use crate::document::{self, Operation};
use crate::literal::LiteralError;
use crate::request::{MutationRequest, ObjectId};

/// Failure talking to the mutation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// Request could not be delivered or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    /// Server answered with a non-success HTTP status.
    #[error("server returned HTTP {status}: {body}")]
    Http {
        /// Status code.
        status: u16,
        /// Response body (possibly truncated).
        body: String,
    },
    /// Server answered with GraphQL errors.
    #[error("{0}")]
    Graphql(String),
    /// Create succeeded on the wire but carried no object id.
    #[error("{kind} creation returned no object id")]
    MissingObjectId {
        /// Kind that was being created.
        kind: String,
    },
    /// Update/delete reported `ok: false`.
    #[error("{kind} {operation} was not acknowledged")]
    NotAcknowledged {
        /// Kind that was targeted.
        kind: String,
        /// `update` or `delete`.
        operation: &'static str,
    },
    /// Request could not be encoded.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] LiteralError),
    /// Response was not valid GraphQL JSON.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// Remote endpoint that executes GraphQL documents scoped by a [`MutationContext`].
///
/// Implementors provide [`execute`](Self::execute); the entity operations are
/// built on top of it but may be overridden (test doubles do).
#[async_trait]
pub trait MutationEndpoint: Send + Sync {
    /// Run `document` and return the response's `data` member.
    async fn execute(&self, ctx: &MutationContext, document: &str) -> Result<Json, MutationError>;

    /// Run a read-only query document. Same wire path as [`execute`](Self::execute).
    async fn query(&self, ctx: &MutationContext, document: &str) -> Result<Json, MutationError> {
        self.execute(ctx, document).await
    }

    /// Create an entity and return its server-assigned id.
    async fn create(
        &self,
        ctx: &MutationContext,
        request: &MutationRequest,
    ) -> Result<ObjectId, MutationError> {
        let doc = document::create_object(request)?;
        let data = self.execute(ctx, &doc).await?;
        document::created_id(&data, &request.kind).ok_or_else(|| MutationError::MissingObjectId {
            kind: request.kind.clone(),
        })
    }

    /// Update the entity `id` with the fields in `request`.
    async fn update(
        &self,
        ctx: &MutationContext,
        id: &ObjectId,
        request: &MutationRequest,
    ) -> Result<(), MutationError> {
        let doc = document::update_object(id, request)?;
        let data = self.execute(ctx, &doc).await?;
        if document::reported_ok(&data, &request.kind, Operation::Update) {
            Ok(())
        } else {
            Err(MutationError::NotAcknowledged {
                kind: request.kind.clone(),
                operation: "update",
            })
        }
    }

    /// Delete the entity `id` of `kind`.
    async fn delete(
        &self,
        ctx: &MutationContext,
        kind: &str,
        id: &ObjectId,
    ) -> Result<(), MutationError> {
        let doc = document::delete_object(kind, id)?;
        let data = self.execute(ctx, &doc).await?;
        if document::reported_ok(&data, kind, Operation::Delete) {
            Ok(())
        } else {
            Err(MutationError::NotAcknowledged {
                kind: kind.to_string(),
                operation: "delete",
            })
        }
    }
}
