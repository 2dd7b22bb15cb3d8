// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use super::{print_json, Project};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::{DrainOutcome, DrainReport, Eviction, SkipReason, SyncReport};

#[derive(Serialize)]
struct SyncOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    drain: Option<&'a DrainReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skipped: Option<&'static str>,
    status: SyncReport,
}

/// Runs one drain pass and reports what happened.
pub async fn run(project: &Project, output: OutputFormat) -> Result<DrainOutcome> {
    let online = project.check_online().await;
    let engine = project.open_engine(online)?;

    let outcome = engine.status().retry().await;
    let status = engine.status().report().await;

    match output {
        OutputFormat::Json => {
            let (drain, skipped) = match &outcome {
                DrainOutcome::Completed(report) => (Some(report), None),
                DrainOutcome::Skipped(reason) => (None, Some(skip_reason(*reason))),
            };
            print_json(&SyncOutput {
                drain,
                skipped,
                status,
            })?;
        }
        OutputFormat::Text => {
            print!("{}", format_text(&outcome, &status));
        }
    }
    Ok(outcome)
}

fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::Offline => "offline",
        SkipReason::Empty => "empty",
        SkipReason::AlreadyDraining => "already_draining",
    }
}

pub fn format_text(outcome: &DrainOutcome, status: &SyncReport) -> String {
    let mut out = match outcome {
        DrainOutcome::Completed(report) => {
            let mut out = format!(
                "Applied {}, retrying {}, evicted {}\n",
                report.applied, report.retried, report.evicted
            );
            for eviction in &report.evictions {
                out.push_str(&format_eviction(eviction));
                out.push('\n');
            }
            out
        }
        DrainOutcome::Skipped(SkipReason::Offline) => {
            "Remote unreachable, nothing sent\n".to_string()
        }
        DrainOutcome::Skipped(SkipReason::Empty) => "Nothing to sync\n".to_string(),
        DrainOutcome::Skipped(SkipReason::AlreadyDraining) => {
            "A sync is already running\n".to_string()
        }
    };
    out.push_str(&format!("{} pending ({})\n", status.pending, status.status));
    out
}

pub fn format_eviction(eviction: &Eviction) -> String {
    let Eviction {
        id,
        kind,
        collection,
        error,
        ..
    } = eviction;
    format!("Gave up on {kind} {collection} ({id}): {error}")
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
