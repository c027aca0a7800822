//! Per-directory window layout overrides.
//!
//! A project may carry a `.muxly` file listing the windows its session
//! should open:
//!
//! ```yaml
//! windows:
//!   - name: edit
//!     cmd: nvim
//!   - name: server
//!     cmd: cargo watch -x run
//! ```

use std::path::Path;

use muxly_core::{Result, Window};
use serde::Deserialize;
use tracing::{debug, warn};

/// Name of the override file inside a project directory.
pub const LAYOUT_FILE_NAME: &str = ".muxly";

#[derive(Debug, Default, Deserialize)]
struct LayoutFile {
    #[serde(default)]
    windows: Vec<Window>,
}

/// Parse override YAML into its window list.
pub fn parse_layout(yaml: &str) -> Result<Vec<Window>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let layout: LayoutFile = serde_yaml::from_str(yaml)?;
    Ok(layout.windows)
}

/// Windows from `dir/.muxly`, if the file exists and lists any.
///
/// The file is optional: a missing, unreadable or malformed file yields
/// `None` and never blocks session creation.
pub fn load_layout(dir: &Path) -> Option<Vec<Window>> {
    let path = dir.join(LAYOUT_FILE_NAME);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };

    match parse_layout(&content) {
        Ok(windows) if windows.iter().any(|w| w.name.trim().is_empty()) => {
            warn!("Ignoring {}: a window has no name", path.display());
            None
        }
        Ok(windows) if !windows.is_empty() => {
            debug!("Using {} windows from {}", windows.len(), path.display());
            Some(windows)
        }
        Ok(_) => None,
        Err(e) => {
            warn!("Ignoring {}: {}", path.display(), e);
            None
        }
    }
}
