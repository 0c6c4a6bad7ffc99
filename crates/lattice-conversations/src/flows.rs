// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Comment and approval actions on a proposed change.

use lattice_app_core::{NotificationSink, RefreshPort, Severity};
use lattice_graphql::{
    MutationContext, MutationEndpoint, MutationError, MutationRequest, ObjectId, Timestamp,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::runner::{CompensatingMutationRunner, RunnerMessages, SubmitOutcome};
use crate::threads::{object_threads_query, ObjectThreads};

/// Headline after a comment and its thread were created.
pub const COMMENT_ADDED: &str = "Comment added";
/// Headline when a comment could not be created.
pub const COMMENT_FAILED: &str = "An error occurred while creating the comment";
/// Headline after an approval was recorded.
pub const CHANGE_APPROVED: &str = "Proposed change approved";
/// Headline when an approval could not be recorded.
pub const APPROVAL_FAILED: &str = "Something went wrong while updating the object";

/// Schema kinds the flows create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationKinds {
    /// Thread attached to the proposed change as a whole.
    pub change_thread: String,
    /// Thread attached to one object path in the diff.
    pub object_thread: String,
    /// Comment inside a thread.
    pub comment: String,
    /// The proposed change itself.
    pub proposed_change: String,
}

impl Default for ConversationKinds {
    fn default() -> Self {
        Self {
            change_thread: "CoreChangeThread".into(),
            object_thread: "CoreObjectThread".into(),
            comment: "CoreThreadComment".into(),
            proposed_change: "CoreProposedChange".into(),
        }
    }
}

/// Result of a comment action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// Blank text or no author; nothing was sent.
    Skipped,
    /// Thread + comment submit ran.
    Submitted(SubmitOutcome),
}

/// Result of an approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// No approver, or the approver already approved; nothing was sent.
    Skipped,
    /// Approver set updated.
    Approved,
    /// Update failed; the user was notified.
    Failed(MutationError),
}

/// Whether `approver` may still approve a change already approved by `approvers`.
pub fn can_approve(approver: Option<&ObjectId>, approvers: &[ObjectId]) -> bool {
    approver.is_some_and(|id| !approvers.contains(id))
}

/// `current` followed by `approver`, without duplicates, order preserved.
pub fn merge_approvers(current: &[ObjectId], approver: &ObjectId) -> Vec<ObjectId> {
    let mut merged: Vec<ObjectId> = Vec::with_capacity(current.len() + 1);
    for id in current.iter().chain(std::iter::once(approver)) {
        if !merged.contains(id) {
            merged.push(id.clone());
        }
    }
    merged
}

/// Conversation actions for one branch scope.
pub struct Conversations<'a, E: ?Sized, N: ?Sized, R: ?Sized> {
    endpoint: &'a E,
    notifier: &'a N,
    refresh: &'a R,
    ctx: MutationContext,
    kinds: ConversationKinds,
}

impl<'a, E, N, R> Conversations<'a, E, N, R>
where
    E: MutationEndpoint + ?Sized,
    N: NotificationSink + ?Sized,
    R: RefreshPort + ?Sized,
{
    /// Actions using the default kinds.
    pub fn new(endpoint: &'a E, notifier: &'a N, refresh: &'a R, ctx: MutationContext) -> Self {
        Self {
            endpoint,
            notifier,
            refresh,
            ctx,
            kinds: ConversationKinds::default(),
        }
    }

    /// Replace the schema kinds.
    #[must_use]
    pub fn with_kinds(mut self, kinds: ConversationKinds) -> Self {
        self.kinds = kinds;
        self
    }

    /// Kinds in use.
    pub fn kinds(&self) -> &ConversationKinds {
        &self.kinds
    }

    /// Start a thread on the proposed change and post `text` as its first comment.
    pub async fn add_comment(
        &self,
        change_id: &ObjectId,
        author: Option<&ObjectId>,
        text: &str,
        now: Timestamp,
    ) -> CommentOutcome {
        let thread = MutationRequest::new(&self.kinds.change_thread)
            .relation("change", change_id)
            .attribute("created_at", now.to_rfc3339())
            .attribute("resolved", false);
        self.submit_comment(thread, author, text, now).await
    }

    /// Start a thread anchored at `object_path` and post `text` as its first comment.
    pub async fn add_object_comment(
        &self,
        change_id: &ObjectId,
        object_path: &str,
        author: Option<&ObjectId>,
        text: &str,
        now: Timestamp,
    ) -> CommentOutcome {
        let thread = MutationRequest::new(&self.kinds.object_thread)
            .relation("change", change_id)
            .attribute("object_path", object_path)
            .attribute("created_at", now.to_rfc3339())
            .attribute("resolved", false);
        self.submit_comment(thread, author, text, now).await
    }

    async fn submit_comment(
        &self,
        thread: MutationRequest,
        author: Option<&ObjectId>,
        text: &str,
        now: Timestamp,
    ) -> CommentOutcome {
        let Some(author) = author else {
            return CommentOutcome::Skipped;
        };
        if text.trim().is_empty() {
            return CommentOutcome::Skipped;
        }

        let mut runner = CompensatingMutationRunner::new(
            self.endpoint,
            self.notifier,
            self.refresh,
            self.ctx.clone(),
            RunnerMessages::new(COMMENT_ADDED, COMMENT_FAILED),
        );
        let comment_kind = self.kinds.comment.clone();
        let outcome = runner
            .run(thread, |thread_id| {
                MutationRequest::new(comment_kind)
                    .attribute("text", text)
                    .relation("created_by", author)
                    .attribute("created_at", now.to_rfc3339())
                    .relation("thread", thread_id)
            })
            .await;
        CommentOutcome::Submitted(outcome)
    }

    /// Add `approver` to the change's approvers.
    pub async fn approve(
        &self,
        change_id: &ObjectId,
        approver: Option<&ObjectId>,
        approvers: &[ObjectId],
    ) -> ApproveOutcome {
        if !can_approve(approver, approvers) {
            return ApproveOutcome::Skipped;
        }
        let Some(approver) = approver else {
            return ApproveOutcome::Skipped;
        };
        let merged = merge_approvers(approvers, approver);
        let request =
            MutationRequest::new(&self.kinds.proposed_change).relations("approved_by", &merged);

        match self.endpoint.update(&self.ctx, change_id, &request).await {
            Ok(()) => {
                info!(change = %change_id, approver = %approver, "proposed change approved");
                self.notifier.notify(Severity::Success, CHANGE_APPROVED, None);
                self.refresh.request_refresh();
                ApproveOutcome::Approved
            }
            Err(err) => {
                error!(change = %change_id, error = %err, "approval failed");
                let details = err.to_string();
                self.notifier
                    .notify(Severity::Error, APPROVAL_FAILED, Some(&details));
                ApproveOutcome::Failed(err)
            }
        }
    }

    /// Threads already anchored at `object_path` for the change.
    pub async fn object_threads(
        &self,
        change_id: &ObjectId,
        object_path: &str,
    ) -> Result<ObjectThreads, MutationError> {
        let kind = &self.kinds.object_thread;
        let document = object_threads_query(kind, change_id, object_path)?;
        let data = self.endpoint.query(&self.ctx, &document).await?;
        ObjectThreads::from_response(&data, kind)
    }
}
