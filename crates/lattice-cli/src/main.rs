// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lattice`: review proposed changes from the terminal.
//! Classifies branch diffs offline and posts comments/approvals to the API.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod diff;
mod remote;
mod settings;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Diff { file, format } => diff::run(&file, format).map(|()| ExitCode::SUCCESS),
        Command::Use { branch, at } => {
            settings::select(&cli.scope, branch, at).map(|()| ExitCode::SUCCESS)
        }
        Command::Comment {
            change,
            author,
            path,
            text,
        } => remote::comment(&cli.scope, &change, &author, path.as_deref(), &text).await,
        Command::Approve {
            change,
            approver,
            approved_by,
        } => remote::approve(&cli.scope, &change, &approver, &approved_by).await,
    }
}
