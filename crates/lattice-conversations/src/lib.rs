// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Proposed-change conversations.
//!
//! [`runner`] holds the two-step "create parent, then child" driver that
//! deletes the parent again when the child cannot be created. [`flows`]
//! builds comment and approval actions on top of it, and [`threads`] reads
//! the existing threads attached to an object.

pub mod flows;
pub mod runner;
pub mod threads;

pub use flows::{can_approve, merge_approvers, ApproveOutcome, CommentOutcome, ConversationKinds, Conversations};
pub use runner::{
    CompensatingMutationRunner, CompensationState, Event, FailureStage, InvalidTransition, Phase,
    RunnerMessages, SubmitOutcome,
};
pub use threads::{object_threads_query, ObjectThreads, ThreadComments};
