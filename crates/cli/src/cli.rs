// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  shelf init --remote ../catalog     Initialize with a document store
  shelf scan 7891000100103 -n Milk   Queue a scanned product
  shelf queue                        Show pending changes
  shelf sync                         Push pending changes now
  shelf watch                        Sync continuously as connectivity allows";

#[derive(Parser)]
#[command(name = "shelf")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Offline-first catalog sync: queue changes locally, push them when online")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Run as if shelf was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Log debug output to stderr (overrides SHELF_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a .shelf directory
    Init {
        /// Document store directory (default: .shelf/remote)
        #[arg(long, value_name = "dir")]
        remote: Option<String>,

        /// host:port probed to decide whether the remote is reachable
        #[arg(long, value_name = "host:port")]
        probe: Option<String>,
    },

    /// Queue creation of a record
    Add {
        #[arg(value_parser = non_empty_string)]
        collection: String,

        /// Record fields as a JSON object
        json: String,
    },

    /// Queue a field update of a record (payload must include "id")
    Update {
        #[arg(value_parser = non_empty_string)]
        collection: String,

        /// Changed fields as a JSON object, including the record "id"
        json: String,
    },

    /// Queue deletion of a record
    Delete {
        #[arg(value_parser = non_empty_string)]
        collection: String,

        /// Remote record id
        #[arg(value_parser = non_empty_string)]
        id: String,
    },

    /// Queue a scanned product
    Scan {
        #[arg(value_parser = non_empty_string)]
        barcode: String,

        #[arg(long, short, value_parser = non_empty_string)]
        name: String,

        #[arg(long, short)]
        brand: Option<String>,

        #[arg(long, short)]
        category: Option<String>,
    },

    /// List pending operations
    Queue {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Show sync status
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Run one sync pass
    Sync {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Sync continuously until interrupted
    Watch {
        /// Print events as JSON lines
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },

    /// Drop all pending operations
    Clear,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
