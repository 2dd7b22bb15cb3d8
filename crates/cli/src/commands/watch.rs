// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::sync::format_eviction;
use super::Project;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::sync::SyncEvent;

/// Runs the engine until Ctrl-C, printing sync events as they happen.
pub async fn run(project: &Project, output: OutputFormat) -> Result<()> {
    let probe = project.probe();
    let online = match &probe {
        Some(probe) => probe.check().await,
        None => true,
    };
    let mut engine = project.open_engine(online)?;
    let mut events = engine.subscribe();

    let _probe =
        probe.map(|probe| probe.spawn(engine.connectivity().clone(), engine.cancel_token()));
    engine.start();
    eprintln!(
        "Watching {} pending, {} (Ctrl-C to stop)",
        engine.queue().len(),
        if online { "online" } else { "offline" }
    );

    let mut online_rx = engine.connectivity().subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    // Set when PermanentFailure events may have been dropped before the
    // pass finished; the completion report then lists the evictions.
    let mut lagged = false;
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = online_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let online = *online_rx.borrow_and_update();
                if output == OutputFormat::Text {
                    println!("{}", if online { "online" } else { "offline" });
                }
            }
            event = events.recv() => match event {
                Ok(event) => {
                    print_event(&event, output)?;
                    if let SyncEvent::DrainCompleted(report) = &event {
                        if lagged && output == OutputFormat::Text {
                            for eviction in &report.evictions {
                                println!("{}", format_eviction(eviction));
                            }
                        }
                        lagged = false;
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!(skipped = n, "event display fell behind");
                    lagged = true;
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    engine.shutdown().await;
    Ok(())
}

fn print_event(event: &SyncEvent, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string(event)?),
        OutputFormat::Text => {
            if let Some(line) = format_event(event) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Human-readable line for an event; `None` for events not worth a line.
pub fn format_event(event: &SyncEvent) -> Option<String> {
    let line = match event {
        SyncEvent::Enqueued {
            kind,
            collection,
            pending,
            ..
        } => format!("queued {kind} on {collection} ({pending} pending)"),
        SyncEvent::Applied {
            kind,
            collection,
            remote_id,
            ..
        } => match remote_id {
            Some(remote_id) => format!("applied {kind} on {collection} as {remote_id}"),
            None => format!("applied {kind} on {collection}"),
        },
        SyncEvent::Retried {
            id,
            retry_count,
            error,
        } => format!("retry {retry_count} for {id}: {error}"),
        SyncEvent::PermanentFailure {
            id,
            kind,
            collection,
            error,
            ..
        } => format!("gave up on {kind} {collection} ({id}): {error}"),
        SyncEvent::DrainStarted { pending } => format!("syncing {pending} pending"),
        SyncEvent::DrainCompleted(report) => format!(
            "sync done: {} applied, {} retrying, {} evicted",
            report.applied, report.retried, report.evicted
        ),
        SyncEvent::PersistenceDegraded { error } => format!("queue not durable: {error}"),
        SyncEvent::Cleared => "queue cleared".to_string(),
        SyncEvent::CollectionsInvalidated { .. } => return None,
    };
    Some(line)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
