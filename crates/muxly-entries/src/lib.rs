//! # muxly-entries
//!
//! Entry resolution engine for muxly.
//!
//! This crate turns configuration into the list the picker shows:
//! - Concurrent bounded-depth directory walking
//! - Collection across scan roots and entry dirs with ignore rules
//! - Unique, tmux-safe display labels
//! - Merging with the live session table
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on muxly-core only.
//! The session table it merges is a plain snapshot type, so it never talks
//! to tmux itself.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collector;
pub mod dedupe;
pub mod merge;
pub mod names;
pub mod resolver;
pub mod walker;

// Re-export commonly used types
pub use collector::{EntryCollector, IgnoreSet};
pub use dedupe::{deduplicate_display_names, MAX_WIDENING_LEVEL};
pub use merge::EntryMap;
pub use names::{dotdir_suffix, sanitize_session_name};
pub use resolver::EntryResolver;
pub use walker::DirectoryWalker;
