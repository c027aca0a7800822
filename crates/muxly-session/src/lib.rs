//! # muxly-session
//!
//! Session lifecycle management for muxly.
//!
//! This crate provides:
//! - The multiplexer seam and its tmux implementation
//! - Session creation from templates and per-directory layout files
//! - Switching with the window-index fallback
//! - Killing sessions with replacement and fallback handling
//! - The picker and confirmation seams
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on muxly-core only.
//! It knows nothing about how entries were collected; it receives a
//! [`muxly_core::Target`] and acts on it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod layout_file;
pub mod manager;
pub mod multiplexer;
pub mod picker;
pub mod prompt;
pub mod testing;
pub mod tmux;

// Re-export commonly used types
pub use layout_file::{load_layout, LAYOUT_FILE_NAME};
pub use manager::{
    Activation, KillOutcome, KillRequest, Resolution, SessionManager, SessionSpec,
};
pub use multiplexer::{session_target, Multiplexer};
pub use picker::{Fzf, Picker, Selection};
pub use prompt::{Answer, Confirm};
pub use tmux::Tmux;
