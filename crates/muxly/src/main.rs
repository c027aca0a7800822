//! # muxly
//!
//! Fuzzy-pick a project directory or a running tmux session, then create,
//! switch to or kill the session for it.
//!
//! ## Overview
//!
//! - `muxly [NAME]` resolves entries and opens the chosen one
//! - `muxly switch [NAME]` moves between running sessions
//! - `muxly kill [SESSION]` kills a session without stranding the client
//! - `muxly config init|edit|path` manages the configuration file
//!
//! ## Architecture
//!
//! This is Layer 2 - the binary that ties together:
//! - muxly-core: Configuration and shared types
//! - muxly-entries: Entry resolution
//! - muxly-session: Session lifecycle

use clap::Parser;
use muxly::{logging, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; the picker and tmux own the terminal
    logging::init(cli.verbose);

    tracing::debug!("muxly v{} starting", env!("CARGO_PKG_VERSION"));

    muxly::run(cli).await
}
