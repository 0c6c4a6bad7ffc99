// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Linked creation with compensation.
//!
//! A submit creates a parent entity, then a child that references the
//! parent's server-assigned id. If the child cannot be created the parent is
//! deleted again so no orphan is left behind. The lifecycle is a small state
//! machine:
//!
//! ```text
//! Idle -> CreatingParent -> CreatingChild -> Completed
//!              |                  |
//!              v                  v
//!            Failed <-------- RollingBack
//! ```
//!
//! Every submit ends with exactly one user notification. Rollback failures
//! are only logged.

use lattice_app_core::{NotificationSink, RefreshPort, Severity};
use lattice_graphql::{MutationContext, MutationEndpoint, MutationError, MutationRequest, ObjectId};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Where a submit currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing in flight.
    Idle,
    /// Waiting on the parent create.
    CreatingParent,
    /// Parent exists; waiting on the child create.
    CreatingChild,
    /// Child failed; deleting the parent.
    RollingBack,
    /// Both entities exist.
    Completed,
    /// Submit ended without a linked pair.
    Failed,
}

impl Phase {
    /// Whether the submit is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    /// Next phase after `event`, or an error if `event` cannot happen here.
    pub fn advance(self, event: Event) -> Result<Phase, InvalidTransition> {
        match (self, event) {
            (Phase::Idle, Event::Submit) => Ok(Phase::CreatingParent),
            (Phase::CreatingParent, Event::ParentCreated) => Ok(Phase::CreatingChild),
            (Phase::CreatingParent, Event::ParentFailed) => Ok(Phase::Failed),
            (Phase::CreatingChild, Event::ChildCreated) => Ok(Phase::Completed),
            (Phase::CreatingChild, Event::ChildFailed) => Ok(Phase::RollingBack),
            (Phase::RollingBack, Event::RollbackFinished) => Ok(Phase::Failed),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Idle => "idle",
            Phase::CreatingParent => "creating-parent",
            Phase::CreatingChild => "creating-child",
            Phase::RollingBack => "rolling-back",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        })
    }
}

/// Inputs to [`Phase::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// User submitted.
    Submit,
    /// Parent create returned an id.
    ParentCreated,
    /// Parent create failed.
    ParentFailed,
    /// Child create returned an id.
    ChildCreated,
    /// Child create failed.
    ChildFailed,
    /// Compensating delete returned, successfully or not.
    RollbackFinished,
}

/// `event` is not legal in phase `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event:?} in phase {from}")]
pub struct InvalidTransition {
    /// Phase the event arrived in.
    pub from: Phase,
    /// Rejected event.
    pub event: Event,
}

/// Bookkeeping for one submit; empty outside of an in-flight submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompensationState {
    /// Parent created in this submit and not yet confirmed or rolled back.
    pub created_parent_id: Option<ObjectId>,
}

/// User-facing headlines for the two outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerMessages {
    /// Shown once both entities exist.
    pub success: String,
    /// Shown on any failure; the error text goes in the details.
    pub failure: String,
}

impl RunnerMessages {
    /// Messages from two headlines.
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failure: failure.into(),
        }
    }
}

/// Which create failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// Nothing was created.
    Parent,
    /// Parent was created and a rollback was attempted.
    Child,
}

/// Result of [`CompensatingMutationRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Parent and child both exist.
    Completed {
        /// Server id of the parent.
        parent_id: ObjectId,
        /// Server id of the child.
        child_id: ObjectId,
    },
    /// The submit failed; `error` is what the user was told about.
    Failed {
        /// Failing step.
        stage: FailureStage,
        /// Create error that ended the submit.
        error: MutationError,
        /// Result of the compensating delete, for child failures.
        rollback: Option<Result<(), MutationError>>,
    },
}

impl SubmitOutcome {
    /// True for [`SubmitOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { .. })
    }
}

/// Drives one linked creation against an endpoint and reports to the user.
pub struct CompensatingMutationRunner<'a, E: ?Sized, N: ?Sized, R: ?Sized> {
    endpoint: &'a E,
    notifier: &'a N,
    refresh: &'a R,
    ctx: MutationContext,
    messages: RunnerMessages,
    phase: Phase,
    state: CompensationState,
}

impl<'a, E, N, R> CompensatingMutationRunner<'a, E, N, R>
where
    E: MutationEndpoint + ?Sized,
    N: NotificationSink + ?Sized,
    R: RefreshPort + ?Sized,
{
    /// Runner issuing every call under `ctx`.
    pub fn new(
        endpoint: &'a E,
        notifier: &'a N,
        refresh: &'a R,
        ctx: MutationContext,
        messages: RunnerMessages,
    ) -> Self {
        Self {
            endpoint,
            notifier,
            refresh,
            ctx,
            messages,
            phase: Phase::Idle,
            state: CompensationState::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current compensation bookkeeping.
    pub fn state(&self) -> &CompensationState {
        &self.state
    }

    /// Create `parent`, then the child built by `child` from the parent id.
    ///
    /// Never returns an error: failures are reported through the
    /// notification sink and described by the returned outcome.
    pub async fn run<F>(&mut self, parent: MutationRequest, child: F) -> SubmitOutcome
    where
        F: FnOnce(&ObjectId) -> MutationRequest,
    {
        self.phase = Phase::Idle;
        self.state = CompensationState::default();
        self.step(Event::Submit);

        let parent_id = match self.endpoint.create(&self.ctx, &parent).await {
            Ok(id) => id,
            Err(err) => {
                self.step(Event::ParentFailed);
                return self.fail(FailureStage::Parent, err, None);
            }
        };
        debug!(kind = %parent.kind, id = %parent_id, "parent created");
        self.state.created_parent_id = Some(parent_id.clone());
        self.step(Event::ParentCreated);

        let child_request = child(&parent_id);
        match self.endpoint.create(&self.ctx, &child_request).await {
            Ok(child_id) => {
                self.step(Event::ChildCreated);
                self.state = CompensationState::default();
                info!(
                    parent_kind = %parent.kind,
                    parent = %parent_id,
                    child_kind = %child_request.kind,
                    child = %child_id,
                    branch = %self.ctx.branch,
                    "linked creation completed"
                );
                self.refresh.request_refresh();
                self.notifier
                    .notify(Severity::Success, &self.messages.success, None);
                SubmitOutcome::Completed {
                    parent_id,
                    child_id,
                }
            }
            Err(err) => {
                self.step(Event::ChildFailed);
                let rollback = self.roll_back(&parent.kind).await;
                self.step(Event::RollbackFinished);
                self.fail(FailureStage::Child, err, Some(rollback))
            }
        }
    }

    /// User closed the form: re-query dependent views.
    pub fn dismiss(&self) {
        self.refresh.request_refresh();
    }

    async fn roll_back(&mut self, kind: &str) -> Result<(), MutationError> {
        let Some(id) = self.state.created_parent_id.take() else {
            return Ok(());
        };
        let result = self.endpoint.delete(&self.ctx, kind, &id).await;
        match &result {
            Ok(()) => debug!(%kind, %id, "parent rolled back"),
            Err(err) => warn!(%kind, %id, error = %err, "rollback delete failed; parent left behind"),
        }
        result
    }

    fn fail(
        &mut self,
        stage: FailureStage,
        error: MutationError,
        rollback: Option<Result<(), MutationError>>,
    ) -> SubmitOutcome {
        self.state = CompensationState::default();
        error!(?stage, %error, branch = %self.ctx.branch, "linked creation failed");
        let details = error.to_string();
        self.notifier
            .notify(Severity::Error, &self.messages.failure, Some(&details));
        SubmitOutcome::Failed {
            stage,
            error,
            rollback,
        }
    }

    fn step(&mut self, event: Event) {
        match self.phase.advance(event) {
            Ok(next) => {
                debug!(from = %self.phase, to = %next, ?event, "runner transition");
                self.phase = next;
            }
            Err(err) => {
                error!(%err, "runner transition rejected");
                self.phase = Phase::Failed;
            }
        }
    }
}
