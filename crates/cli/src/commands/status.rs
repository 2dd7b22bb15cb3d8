// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{print_json, Project};
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::SyncReport;

pub async fn run(project: &Project, output: OutputFormat) -> Result<()> {
    let online = project.check_online().await;
    let engine = project.open_engine(online)?;
    let report = engine.status().report().await;
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", format_text(&report)),
    }
    Ok(())
}

pub fn format_text(report: &SyncReport) -> String {
    let mut out = format!(
        "Status:    {}\nOnline:    {}\nPending:   {}\n",
        report.status,
        if report.online { "yes" } else { "no" },
        report.pending
    );
    match report.last_sync {
        Some(at) => out.push_str(&format!("Last sync: {}\n", at.to_rfc3339())),
        None => out.push_str("Last sync: never\n"),
    }
    if let Some(err) = &report.degraded {
        out.push_str(&format!("Warning:   queue not durable: {err}\n"));
    }
    out
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
