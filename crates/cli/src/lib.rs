// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! shelfrs - Offline-first sync engine for a catalog app.
//!
//! This crate provides the sync engine behind the `shelf` CLI: local
//! mutations are queued durably and pushed to a remote document store
//! whenever it is reachable.
//!
//! # Main Components
//!
//! - [`sync::MutationQueue`] - Durable FIFO of pending operations
//! - [`sync::SyncProcessor`] - Applies queued operations with bounded retries
//! - [`sync::Connectivity`] - Online/offline state and the TCP probe
//! - [`sync::SyncStatusAggregator`] - Status for display
//! - [`sync::SyncEngine`] - Owns the components and runs the drain worker
//! - [`Config`] - Project configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use shelfrs::sync::{Connectivity, DirectoryRemote, ProcessorConfig, SyncEngine};
//! use shelf_core::{JsonlQueueStore, OpIdGenerator, OpKind};
//!
//! let mut engine = SyncEngine::new(
//!     Box::new(JsonlQueueStore::open(".shelf/queue")?),
//!     Arc::new(DirectoryRemote::new("catalog")),
//!     Connectivity::new(false),
//!     OpIdGenerator::random(),
//!     ProcessorConfig::default(),
//! )?;
//! engine.start();
//! engine.queue().enqueue(OpKind::Create, "lists", payload).await?;
//! engine.connectivity().set_online(true); // drains
//! ```

mod cli;
mod commands;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};

use commands::Project;

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;
    runtime.block_on(dispatch(command))
}

async fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Init { remote, probe } => commands::init::run(remote, probe),
        Command::Add { collection, json } => {
            commands::enqueue::add(&Project::find()?, &collection, &json).await?;
            Ok(())
        }
        Command::Update { collection, json } => {
            commands::enqueue::update(&Project::find()?, &collection, &json).await?;
            Ok(())
        }
        Command::Delete { collection, id } => {
            commands::enqueue::delete(&Project::find()?, &collection, &id).await?;
            Ok(())
        }
        Command::Scan {
            barcode,
            name,
            brand,
            category,
        } => {
            commands::enqueue::scan(&Project::find()?, &barcode, &name, brand, category).await?;
            Ok(())
        }
        Command::Queue { output } => commands::queue::run(&Project::find()?, output).await,
        Command::Status { output } => commands::status::run(&Project::find()?, output).await,
        Command::Sync { output } => {
            commands::sync::run(&Project::find()?, output).await?;
            Ok(())
        }
        Command::Watch { output } => commands::watch::run(&Project::find()?, output).await,
        Command::Clear => {
            commands::clear::run(&Project::find()?).await?;
            Ok(())
        }
    }
}
