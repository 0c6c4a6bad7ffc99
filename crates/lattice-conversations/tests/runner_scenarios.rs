// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Compensating runner against scripted endpoints.
#![allow(clippy::unwrap_used, clippy::panic)]

use lattice_app_core::{Severity, ToastService};
use lattice_conversations::{
    CompensatingMutationRunner, FailureStage, Phase, RunnerMessages, SubmitOutcome,
};
use lattice_dry_tests::{CountingRefresh, EndpointCall, RecordingSink, ScriptedEndpoint};
use lattice_graphql::{MutationContext, MutationError, MutationRequest, ObjectId};
use std::sync::Mutex;

fn thread() -> MutationRequest {
    MutationRequest::new("CoreChangeThread").relation("change", &ObjectId::new("pc-1"))
}

fn comment(thread_id: &ObjectId) -> MutationRequest {
    MutationRequest::new("CoreThreadComment")
        .attribute("text", "please split this prefix")
        .relation("thread", thread_id)
}

fn branch_of(call: &EndpointCall) -> &str {
    match call {
        EndpointCall::Create { ctx, .. }
        | EndpointCall::Update { ctx, .. }
        | EndpointCall::Delete { ctx, .. }
        | EndpointCall::Execute { ctx, .. } => &ctx.branch,
    }
}

fn messages() -> RunnerMessages {
    RunnerMessages::new("Comment added", "An error occurred while creating the comment")
}

#[tokio::test]
async fn parent_and_child_succeed() {
    let endpoint = ScriptedEndpoint::new().creating(["T1", "C1"]);
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("feature-1"),
        messages(),
    );

    let outcome = runner.run(thread(), comment).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Completed {
            parent_id: ObjectId::new("T1"),
            child_id: ObjectId::new("C1"),
        }
    );
    assert_eq!(runner.phase(), Phase::Completed);
    assert_eq!(runner.state().created_parent_id, None);
    assert_eq!(refresh.count(), 1);
    assert_eq!(sink.count(), 1);
    assert_eq!(sink.count_of(Severity::Success), 1);
    assert!(endpoint.deletes().is_empty());

    // child references the parent id and both calls carry the branch scope
    let created = endpoint.created();
    assert_eq!(created[1].fields["thread"], serde_json::json!({"id": "T1"}));
    let calls = endpoint.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| branch_of(call) == "feature-1"));
}

#[tokio::test]
async fn child_failure_deletes_parent() {
    let endpoint = ScriptedEndpoint::new().creating(["T1"]);
    endpoint.script_create(Err(MutationError::Graphql("text is mandatory".into())));
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("review-7"),
        messages(),
    );

    let outcome = runner.run(thread(), comment).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            stage: FailureStage::Child,
            error: MutationError::Graphql("text is mandatory".into()),
            rollback: Some(Ok(())),
        }
    );
    assert_eq!(runner.phase(), Phase::Failed);
    assert_eq!(runner.state().created_parent_id, None);
    assert_eq!(
        endpoint.deletes(),
        vec![("CoreChangeThread".to_string(), ObjectId::new("T1"))]
    );
    // the rollback delete is scoped like the creates
    let calls = endpoint.calls();
    assert_eq!(calls.len(), 3);
    assert!(matches!(&calls[2], EndpointCall::Delete { ctx, .. } if ctx.branch == "review-7"));
    assert!(calls.iter().all(|call| branch_of(call) == "review-7"));
    let notes = sink.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Error);
    assert_eq!(notes[0].message, "An error occurred while creating the comment");
    assert_eq!(notes[0].details.as_deref(), Some("text is mandatory"));
    assert_eq!(refresh.count(), 0);
}

#[tokio::test]
async fn failed_rollback_still_notifies_once() {
    let endpoint = ScriptedEndpoint::new().creating(["T1"]);
    endpoint.script_create(Err(MutationError::Transport("connection reset".into())));
    endpoint.script_delete(Err(MutationError::Http {
        status: 503,
        body: "unavailable".into(),
    }));
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("main"),
        messages(),
    );

    let outcome = runner.run(thread(), comment).await;

    match outcome {
        SubmitOutcome::Failed {
            stage,
            error,
            rollback,
        } => {
            assert_eq!(stage, FailureStage::Child);
            assert_eq!(error, MutationError::Transport("connection reset".into()));
            assert!(matches!(rollback, Some(Err(MutationError::Http { status: 503, .. }))));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(endpoint.deletes().len(), 1);
    assert_eq!(sink.count(), 1);
    assert_eq!(sink.count_of(Severity::Error), 1);
    // the user sees the child error, not the delete error
    assert_eq!(
        sink.notifications()[0].details.as_deref(),
        Some("transport error: connection reset")
    );
}

#[tokio::test]
async fn parent_failure_never_deletes() {
    let endpoint = ScriptedEndpoint::new();
    endpoint.script_create(Err(MutationError::Graphql("change not found".into())));
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let mut child_built = false;
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("main"),
        messages(),
    );

    let outcome = runner
        .run(thread(), |id| {
            child_built = true;
            comment(id)
        })
        .await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            stage: FailureStage::Parent,
            rollback: None,
            ..
        }
    ));
    assert!(!child_built);
    assert_eq!(runner.phase(), Phase::Failed);
    assert!(endpoint.deletes().is_empty());
    assert_eq!(endpoint.calls().len(), 1);
    assert_eq!(sink.count_of(Severity::Error), 1);
    assert_eq!(refresh.count(), 0);
}

#[tokio::test]
async fn runner_can_submit_again_after_failure() {
    let endpoint = ScriptedEndpoint::new();
    endpoint.script_create(Err(MutationError::Graphql("busy".into())));
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("main"),
        messages(),
    );
    assert!(!runner.run(thread(), comment).await.is_completed());

    endpoint.script_create(Ok(ObjectId::new("T2")));
    endpoint.script_create(Ok(ObjectId::new("C2")));
    assert!(runner.run(thread(), comment).await.is_completed());
    assert_eq!(runner.phase(), Phase::Completed);
    assert_eq!(sink.count(), 2);
}

#[tokio::test]
async fn dismiss_requests_refresh() {
    let endpoint = ScriptedEndpoint::new();
    let sink = RecordingSink::new();
    let refresh = CountingRefresh::new();
    let runner = CompensatingMutationRunner::new(
        &endpoint,
        &sink,
        &refresh,
        MutationContext::new("main"),
        messages(),
    );
    runner.dismiss();
    assert_eq!(refresh.count(), 1);
    assert_eq!(runner.phase(), Phase::Idle);
    assert!(endpoint.calls().is_empty());
}

#[tokio::test]
async fn toast_queue_receives_the_single_notification() {
    let endpoint = ScriptedEndpoint::new().creating(["T1"]);
    endpoint.script_create(Err(MutationError::Graphql("nope".into())));
    let toasts = Mutex::new(ToastService::default());
    let refresh = || {};
    let mut runner = CompensatingMutationRunner::new(
        &endpoint,
        &toasts,
        &refresh,
        MutationContext::new("main"),
        messages(),
    );
    runner.run(thread(), comment).await;

    let toasts = toasts.into_inner().unwrap();
    assert_eq!(toasts.len(), 1);
    let shown = toasts.visible(std::time::Instant::now());
    assert_eq!(shown[0].severity, Severity::Error);
    assert_eq!(shown[0].details.as_deref(), Some("nope"));
}
