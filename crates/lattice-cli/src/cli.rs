// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "lattice", author, version, about = "Lattice review client")]
pub struct Cli {
    #[command(flatten)]
    pub scope: ScopeArgs,
    #[command(subcommand)]
    pub command: Command,
}

/// Flags that override stored config and session selection.
#[derive(Args, Debug, Default, Clone)]
pub struct ScopeArgs {
    /// API address (overrides config and LATTICE_ADDRESS)
    #[arg(long, global = true)]
    pub address: Option<String>,
    /// Branch to act on (overrides the saved selection)
    #[arg(long, global = true)]
    pub branch: Option<String>,
    /// As-of time: RFC 3339 or relative ("5m", "2h", "1h 30s")
    #[arg(long, global = true)]
    pub at: Option<String>,
    /// Directory holding client.json / session.json (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify a branch diff (JSON array of property changes; "-" reads stdin)
    Diff {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Save the branch (and optional as-of time) used by later commands
    Use {
        branch: String,
        #[arg(long)]
        at: Option<String>,
    },
    /// Open a thread on a proposed change and post the first comment
    Comment {
        /// Proposed change id
        #[arg(long)]
        change: String,
        /// Account id of the author
        #[arg(long)]
        author: String,
        /// Anchor the thread at an object path instead of the whole change
        #[arg(long)]
        path: Option<String>,
        text: String,
    },
    /// Approve a proposed change
    Approve {
        /// Proposed change id
        #[arg(long)]
        change: String,
        /// Account id of the approver
        #[arg(long)]
        approver: String,
        /// Accounts that already approved (repeatable)
        #[arg(long = "approved-by")]
        approved_by: Vec<String>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn scope_flags_are_global() {
        let cli = Cli::parse_from([
            "lattice",
            "approve",
            "--change",
            "pc-1",
            "--approver",
            "u-2",
            "--approved-by",
            "u-1",
            "--branch",
            "feature-1",
        ]);
        assert_eq!(cli.scope.branch.as_deref(), Some("feature-1"));
        match cli.command {
            Command::Approve { approved_by, .. } => assert_eq!(approved_by, vec!["u-1"]),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
