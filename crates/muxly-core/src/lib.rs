//! # muxly-core
//!
//! Core types for muxly.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other muxly crates. It provides:
//!
//! - Configuration model, YAML loading and validation
//! - Path expression resolution (`~`, `$VAR`, absolute)
//! - Entry and target types shared by resolution and session handling
//! - Error types
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other muxly crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod entry;
pub mod error;
pub mod path;

// Re-export commonly used types
pub use config::{
    Config, EntryPath, ScanRoot, SessionTemplate, Settings, Window, BUILTIN_IGNORE_NAMES,
    STARTER_CONFIG,
};
pub use entry::{session_name_for, DirEntry, SessionTable, Target};
pub use error::{Error, PathError, Result};
pub use path::{is_path_like, resolve_path};
