// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `lattice diff`: classify a branch diff file and print what a reviewer sees.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use lattice_diff::{classify, DiffDisplay, DiffSummary, PropertyChange};
use serde_json::json;
use tracing::warn;

use crate::cli::OutputFormat;

pub fn run(file: &Path, format: OutputFormat) -> Result<()> {
    let raw = read_input(file)?;
    let changes = parse_changes(&raw).with_context(|| format!("parse diff {}", file.display()))?;
    print!("{}", render(&changes, format)?);
    Ok(())
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read diff from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(file).with_context(|| format!("read {}", file.display()))
}

/// Accepts a bare array of changes or an object with a `changes` array.
pub fn parse_changes(raw: &str) -> Result<Vec<PropertyChange>> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let list = match value {
        serde_json::Value::Object(mut map) if map.contains_key("changes") => map
            .remove("changes")
            .unwrap_or(serde_json::Value::Null),
        other => other,
    };
    let changes: Vec<PropertyChange> = serde_json::from_value(list)?;
    for (idx, change) in changes.iter().enumerate() {
        if !change.is_well_formed() {
            warn!(index = idx, action = %change.action, "change is missing a side its action implies");
        }
    }
    Ok(changes)
}

pub fn render(changes: &[PropertyChange], format: OutputFormat) -> Result<String> {
    let displays: Vec<DiffDisplay> = changes.iter().map(classify).collect();
    let summary = DiffSummary::tally(changes);
    let out = match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(&json!({
                "changes": displays,
                "summary": summary,
            }))?;
            out.push('\n');
            out
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (change, display) in changes.iter().zip(&displays) {
                out.push_str(&format!(
                    "{:<9} {}{}\n",
                    display.action,
                    property_type(change),
                    display.to_text()
                ));
            }
            out.push_str(&summary_line(&summary));
            out
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["action", "property", "value", "kind"]);
            for (change, display) in changes.iter().zip(&displays) {
                let kinds = display
                    .values
                    .iter()
                    .filter_map(|v| v.kind.as_ref().map(ToString::to_string))
                    .collect::<Vec<_>>()
                    .join(", ");
                table.add_row(vec![
                    display.action.to_string(),
                    change.property_type.clone().unwrap_or_default(),
                    display.to_text(),
                    kinds,
                ]);
            }
            format!("{table}\n{}", summary_line(&summary))
        }
    };
    Ok(out)
}

fn property_type(change: &PropertyChange) -> String {
    change
        .property_type
        .as_deref()
        .map(|t| format!("{t}: "))
        .unwrap_or_default()
}

fn summary_line(summary: &DiffSummary) -> String {
    let mut line = format!(
        "{} changes: {} added, {} removed, {} updated",
        summary.total(),
        summary.added,
        summary.removed,
        summary.updated
    );
    if summary.has_conflicts() {
        line.push_str(&format!(", {} in conflict", summary.conflict));
    }
    line.push('\n');
    line
}
