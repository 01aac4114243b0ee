//! CLI commands for the ferrum node.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ferrum execution-core node
#[derive(Parser)]
#[clap(name = "ferrum-node", version, about, long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Run with verbose per-opcode tracing enabled
    #[clap(long, global = true)]
    pub dev: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a JSON fixture: import its headers into a block chain and run
    /// its bytecode programs through the interpreter.
    Run {
        /// Path to the fixture file. Falls back to a small built-in demo
        /// fixture when omitted.
        #[clap(long)]
        fixture: Option<PathBuf>,
    },
    /// Print the active protocol configuration.
    Config,
}
