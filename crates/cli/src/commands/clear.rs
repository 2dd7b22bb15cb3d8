// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::Project;
use crate::error::Result;

/// Drops every pending operation. Returns how many were dropped.
pub async fn run(project: &Project) -> Result<usize> {
    let engine = project.open_engine(false)?;
    let dropped = engine.queue().len();
    engine.queue().clear().await?;
    println!("Cleared {dropped} pending operation(s)");
    Ok(dropped)
}

#[cfg(test)]
#[path = "clear_tests.rs"]
mod tests;
