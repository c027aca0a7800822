//! Interactive choice among labels.

use std::io::Write;
use std::process::{Command, Stdio};

use muxly_core::{Error, Result};
use tracing::debug;

/// Outcome of a picker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The user chose this label
    Chosen(String),
    /// The user backed out; nothing should happen
    Cancelled,
}

/// Something that lets the user choose one of several labels.
pub trait Picker {
    /// Present `labels` in order and wait for a choice.
    fn pick(&self, labels: &[String]) -> Result<Selection>;
}

/// `fzf` exit status when the user aborts with Esc or Ctrl-C.
const FZF_INTERRUPTED: i32 = 130;
/// `fzf` exit status when nothing matched.
const FZF_NO_MATCH: i32 = 1;

/// Runs `fzf` with the labels on stdin.
#[derive(Debug, Clone)]
pub struct Fzf {
    binary: String,
}

impl Default for Fzf {
    fn default() -> Self {
        Self {
            binary: "fzf".to_string(),
        }
    }
}

impl Fzf {
    /// Use the `fzf` on `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

impl Picker for Fzf {
    fn pick(&self, labels: &[String]) -> Result<Selection> {
        let mut child = Command::new(&self.binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::Picker(format!("failed to run {}: {e}", self.binary)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // fzf may exit before reading everything; that is not our error.
            let _ = stdin.write_all(labels.join("\n").as_bytes());
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Picker(format!("{} did not finish: {e}", self.binary)))?;

        match output.status.code() {
            Some(0) => Ok(selection_from(&String::from_utf8_lossy(&output.stdout))),
            Some(FZF_INTERRUPTED) | Some(FZF_NO_MATCH) => {
                debug!("Picker cancelled ({})", output.status);
                Ok(Selection::Cancelled)
            }
            _ => Err(Error::Picker(format!(
                "{} exited with {}",
                self.binary, output.status
            ))),
        }
    }
}

/// Interpret picker output: an empty selection counts as cancellation.
pub fn selection_from(stdout: &str) -> Selection {
    let choice = stdout.trim();
    if choice.is_empty() {
        Selection::Cancelled
    } else {
        Selection::Chosen(choice.to_string())
    }
}
