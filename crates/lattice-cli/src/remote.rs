// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lattice comment` / `lattice approve`: conversation flows against the API.

use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lattice_app_core::{Severity, ToastService};
use lattice_conversations::{ApproveOutcome, CommentOutcome, Conversations, SubmitOutcome};
use lattice_graphql::{GraphqlClient, MutationContext, ObjectId, Timestamp};
use tracing::debug;

use crate::cli::ScopeArgs;
use crate::settings;

struct Session {
    client: GraphqlClient,
    ctx: MutationContext,
}

fn connect(scope: &ScopeArgs) -> Result<Session> {
    let service = settings::open(scope)?;
    let config = settings::client_config(&service, scope)?;
    let prefs = settings::session(&service, scope)?;
    let ctx = settings::context(&config, &prefs)?;
    let client = GraphqlClient::new(&config).context("build API client")?;
    debug!(address = %config.address, branch = %ctx.branch, at = ?ctx.at, "session ready");
    Ok(Session { client, ctx })
}

fn print_toasts(toasts: Mutex<ToastService>) {
    let toasts = toasts.into_inner().unwrap_or_else(|e| e.into_inner());
    for toast in toasts.visible(Instant::now()) {
        let tag = match toast.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        match toast.details {
            Some(details) => eprintln!("[{tag}] {}: {details}", toast.message),
            None => eprintln!("[{tag}] {}", toast.message),
        }
    }
}

fn refresh() {
    debug!("refresh requested");
}

pub async fn comment(
    scope: &ScopeArgs,
    change: &str,
    author: &str,
    path: Option<&str>,
    text: &str,
) -> Result<ExitCode> {
    let session = connect(scope)?;
    let toasts = Mutex::new(ToastService::default());
    let flows = Conversations::new(&session.client, &toasts, &refresh, session.ctx.clone());
    let change = ObjectId::new(change);
    let author = ObjectId::new(author);

    let outcome = match path {
        Some(path) => {
            flows
                .add_object_comment(&change, path, Some(&author), text, Timestamp::now())
                .await
        }
        None => {
            flows
                .add_comment(&change, Some(&author), text, Timestamp::now())
                .await
        }
    };
    print_toasts(toasts);

    match outcome {
        CommentOutcome::Skipped => bail!("comment text is empty"),
        CommentOutcome::Submitted(SubmitOutcome::Completed { parent_id, child_id }) => {
            println!("thread {parent_id} comment {child_id}");
            Ok(ExitCode::SUCCESS)
        }
        // already reported by the toast
        CommentOutcome::Submitted(SubmitOutcome::Failed { .. }) => Ok(ExitCode::FAILURE),
    }
}

pub async fn approve(
    scope: &ScopeArgs,
    change: &str,
    approver: &str,
    approved_by: &[String],
) -> Result<ExitCode> {
    let session = connect(scope)?;
    let toasts = Mutex::new(ToastService::default());
    let flows = Conversations::new(&session.client, &toasts, &refresh, session.ctx.clone());
    let approvers: Vec<ObjectId> = approved_by.iter().map(|id| ObjectId::new(id.as_str())).collect();

    let outcome = flows
        .approve(&ObjectId::new(change), Some(&ObjectId::new(approver)), &approvers)
        .await;
    print_toasts(toasts);

    match outcome {
        ApproveOutcome::Approved => Ok(ExitCode::SUCCESS),
        ApproveOutcome::Skipped => bail!("{approver} has already approved {change}"),
        ApproveOutcome::Failed(_) => Ok(ExitCode::FAILURE),
    }
}
