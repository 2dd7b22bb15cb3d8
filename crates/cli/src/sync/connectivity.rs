// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability tracking.
//!
//! [`Connectivity`] is the single source of truth for online/offline state.
//! Anything can publish into it (a probe, a test, a platform hook) and the
//! engine reacts to offline→online transitions.

use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Cloneable online/offline handle.
#[derive(Debug, Clone)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

impl Connectivity {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Connectivity { tx }
    }

    /// Publishes the current reachability. Returns true if it changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "connectivity changed");
        }
        changed
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Subscribes to changes. The receiver starts with the current value seen.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Periodic TCP reachability probe.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    target: String,
    interval: Duration,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(target: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        TcpProbe {
            target: target.into(),
            interval,
            timeout,
        }
    }

    /// Attempts one connection to the target.
    pub async fn check(&self) -> bool {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.target)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!(target = %self.target, error = %e, "probe failed");
                false
            }
            Err(_) => {
                debug!(target = %self.target, "probe timed out");
                false
            }
        }
    }

    /// Probes immediately and then every interval until cancelled.
    pub fn spawn(self, connectivity: Connectivity, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let online = tokio::select! {
                            _ = cancel.cancelled() => break,
                            online = self.check() => online,
                        };
                        connectivity.set_online(online);
                    }
                }
            }
            debug!(target = %self.target, "probe stopped");
        })
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
