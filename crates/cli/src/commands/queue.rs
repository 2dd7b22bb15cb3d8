// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use shelf_core::Operation;

use super::{print_json, Project};
use crate::cli::OutputFormat;
use crate::error::Result;

pub async fn run(project: &Project, output: OutputFormat) -> Result<()> {
    let engine = project.open_engine(false)?;
    let ops = engine.queue().snapshot().await;
    match output {
        OutputFormat::Json => print_json(&ops)?,
        OutputFormat::Text => print!("{}", format_text(&ops)),
    }
    Ok(())
}

/// One line per operation, oldest first.
pub fn format_text(ops: &[Operation]) -> String {
    if ops.is_empty() {
        return "No pending operations\n".to_string();
    }
    let mut out = String::new();
    for op in ops {
        let target = op.remote_id().unwrap_or("(new)");
        let mut line = format!("{}  {:<6}  {}/{}", op.id, op.kind, op.collection, target);
        if op.retry_count > 0 {
            line.push_str(&format!("  retries: {}", op.retry_count));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&format!("{} pending\n", ops.len()));
    out
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
