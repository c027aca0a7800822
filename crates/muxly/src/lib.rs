//! muxly command-line library
//!
//! Argument parsing, logging setup and the command handlers. The binary
//! entry point is in main.rs.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod prompt;

// Re-export commonly used types
pub use cli::{Cli, Command, ConfigCommand};
pub use commands::{run, LaunchOutcome};
pub use prompt::StdinConfirm;
