//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Fuzzy-pick project directories and tmux sessions.
#[derive(Debug, Parser)]
#[command(name = "muxly", version, about)]
pub struct Cli {
    /// Open this entry directly instead of showing the picker
    pub name: Option<String>,

    /// Scan depth for every scan dir, overriding configured depths
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub depth: Option<u32>,

    /// Configuration file [default: $XDG_CONFIG_HOME/muxly/config.yaml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Depth flag as passed to resolution; 0 means not given.
    pub fn flag_depth(&self) -> usize {
        self.depth.map_or(0, |d| d as usize)
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Switch to another running session
    Switch {
        /// Session to switch to; the picker is shown when omitted
        name: Option<String>,
    },
    /// Kill a session, moving the client elsewhere first if needed
    Kill {
        /// Session to kill [default: the current session]
        session: Option<String>,
        /// Session to move to when killing the current one
        #[arg(long = "to", value_name = "SESSION")]
        replacement: Option<String>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// `muxly config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a starter configuration
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Open the configuration in an editor
    Edit {
        /// Editor command [default: settings.editor, then $EDITOR, then vi]
        editor: Option<String>,
    },
    /// Print the configuration file location
    Path,
}
