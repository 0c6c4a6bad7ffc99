// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted [`MutationEndpoint`] fake.
//!
//! Results are queued per operation and consumed in order. Unscripted
//! creates and queries fail with a transport error; unscripted updates and
//! deletes succeed.

use async_trait::async_trait;
use lattice_graphql::{MutationContext, MutationEndpoint, MutationError, MutationRequest, ObjectId};
use serde_json::Value as Json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One call observed by [`ScriptedEndpoint`].
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointCall {
    /// `create`.
    Create {
        /// Scope the call carried.
        ctx: MutationContext,
        /// Request as sent.
        request: MutationRequest,
    },
    /// `update`.
    Update {
        /// Scope the call carried.
        ctx: MutationContext,
        /// Target id.
        id: ObjectId,
        /// Request as sent.
        request: MutationRequest,
    },
    /// `delete`.
    Delete {
        /// Scope the call carried.
        ctx: MutationContext,
        /// Target kind.
        kind: String,
        /// Target id.
        id: ObjectId,
    },
    /// `execute` / `query`.
    Execute {
        /// Scope the call carried.
        ctx: MutationContext,
        /// Raw document.
        document: String,
    },
}

#[derive(Default)]
struct Inner {
    creates: VecDeque<Result<ObjectId, MutationError>>,
    updates: VecDeque<Result<(), MutationError>>,
    deletes: VecDeque<Result<(), MutationError>>,
    executes: VecDeque<Result<Json, MutationError>>,
    calls: Vec<EndpointCall>,
}

/// Mutation endpoint with queued results and a call log.
///
/// ```
/// use lattice_dry_tests::ScriptedEndpoint;
/// use lattice_graphql::{MutationContext, MutationEndpoint, MutationRequest, ObjectId};
///
/// # tokio_test_block_on(async {
/// let endpoint = ScriptedEndpoint::new().creating(["T1"]);
/// let id = endpoint
///     .create(&MutationContext::new("main"), &MutationRequest::new("CoreChangeThread"))
///     .await
///     .unwrap();
/// assert_eq!(id, ObjectId::new("T1"));
/// assert_eq!(endpoint.calls().len(), 1);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone, Default)]
pub struct ScriptedEndpoint {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedEndpoint {
    /// Endpoint with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue successful creates returning `ids` in order.
    pub fn creating<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            self.script_create(Ok(ObjectId::new(id)));
        }
        self
    }

    /// Queue one create result.
    pub fn script_create(&self, result: Result<ObjectId, MutationError>) {
        self.lock().creates.push_back(result);
    }

    /// Queue one update result.
    pub fn script_update(&self, result: Result<(), MutationError>) {
        self.lock().updates.push_back(result);
    }

    /// Queue one delete result.
    pub fn script_delete(&self, result: Result<(), MutationError>) {
        self.lock().deletes.push_back(result);
    }

    /// Queue one `execute`/`query` result.
    pub fn script_execute(&self, result: Result<Json, MutationError>) {
        self.lock().executes.push_back(result);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<EndpointCall> {
        self.lock().calls.clone()
    }

    /// `(kind, id)` of every delete so far.
    pub fn deletes(&self) -> Vec<(String, ObjectId)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EndpointCall::Delete { kind, id, .. } => Some((kind.clone(), id.clone())),
                _ => None,
            })
            .collect()
    }

    /// Requests of every create so far.
    pub fn created(&self) -> Vec<MutationRequest> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EndpointCall::Create { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn unscripted(op: &str) -> MutationError {
    MutationError::Transport(format!("no scripted {op} result"))
}

#[async_trait]
impl MutationEndpoint for ScriptedEndpoint {
    async fn execute(&self, ctx: &MutationContext, document: &str) -> Result<Json, MutationError> {
        let mut inner = self.lock();
        inner.calls.push(EndpointCall::Execute {
            ctx: ctx.clone(),
            document: document.to_string(),
        });
        inner
            .executes
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("execute")))
    }

    async fn create(
        &self,
        ctx: &MutationContext,
        request: &MutationRequest,
    ) -> Result<ObjectId, MutationError> {
        let mut inner = self.lock();
        inner.calls.push(EndpointCall::Create {
            ctx: ctx.clone(),
            request: request.clone(),
        });
        inner
            .creates
            .pop_front()
            .unwrap_or_else(|| Err(unscripted("create")))
    }

    async fn update(
        &self,
        ctx: &MutationContext,
        id: &ObjectId,
        request: &MutationRequest,
    ) -> Result<(), MutationError> {
        let mut inner = self.lock();
        inner.calls.push(EndpointCall::Update {
            ctx: ctx.clone(),
            id: id.clone(),
            request: request.clone(),
        });
        inner.updates.pop_front().unwrap_or(Ok(()))
    }

    async fn delete(
        &self,
        ctx: &MutationContext,
        kind: &str,
        id: &ObjectId,
    ) -> Result<(), MutationError> {
        let mut inner = self.lock();
        inner.calls.push(EndpointCall::Delete {
            ctx: ctx.clone(),
            kind: kind.to_string(),
            id: id.clone(),
        });
        inner.deletes.pop_front().unwrap_or(Ok(()))
    }
}
