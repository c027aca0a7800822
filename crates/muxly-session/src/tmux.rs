//! tmux implementation of [`Multiplexer`].

use std::env;
use std::path::Path;
use std::process::{Command, Output};

use muxly_core::{Error, Result, Window};
use tracing::{debug, trace};

use crate::multiplexer::Multiplexer;

/// Shell used for window commands when `$SHELL` is unset.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Drives the `tmux` binary, one subprocess per primitive.
#[derive(Debug, Clone)]
pub struct Tmux {
    binary: String,
    inside: bool,
    shell: String,
}

impl Tmux {
    /// Configure from the environment: `$TMUX` decides whether we run inside
    /// a client, `$SHELL` wraps window commands.
    pub fn from_env() -> Self {
        let inside = env::var_os("TMUX").is_some_and(|v| !v.is_empty());
        let shell = env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SHELL.to_string());
        Self {
            binary: "tmux".to_string(),
            inside,
            shell,
        }
    }

    /// Override the tmux executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Whether the `tmux` binary can be run at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-V")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    fn output(&self, operation: &str, args: &[String]) -> Result<Output> {
        trace!("{} {}", self.binary, args.join(" "));
        Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| {
                Error::multiplexer(operation, format!("failed to run {}: {e}", self.binary))
            })
    }

    fn run(&self, operation: &str, args: &[String]) -> Result<()> {
        let output = self.output(operation, args)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(Error::multiplexer(operation, failure_message(&output)))
        }
    }
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stderr = stderr.trim();
    if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr.to_string()
    }
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

/// Arguments creating one window.
///
/// The first window of a session is made with `new-session -d`, later ones
/// with `new-window`. A command runs as `shell -lc "cmd; exec shell"` so the
/// window survives the command exiting.
pub fn build_window_args(
    first: bool,
    session: &str,
    window: &Window,
    dir: &Path,
    shell: &str,
) -> Vec<String> {
    let dir = dir.to_string_lossy();
    let mut args = if first {
        strings(&["new-session", "-ds", session, "-n", &window.name, "-c", &dir])
    } else {
        strings(&["new-window", "-t", session, "-n", &window.name, "-c", &dir])
    };

    if let Some(cmd) = window.command() {
        args.extend(strings(&["--", shell, "-lc", &format!("{cmd}; exec {shell}")]));
    }

    args
}

impl Multiplexer for Tmux {
    fn has_session(&self, name: &str) -> bool {
        // `=` forces an exact match instead of tmux's prefix matching
        let target = format!("={name}");
        self.run("has-session", &strings(&["has-session", "-t", &target]))
            .is_ok()
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let output = self.output(
            "list-sessions",
            &strings(&["list-sessions", "-F", "#{session_name}"]),
        )?;
        if !output.status.success() {
            debug!("No tmux server: {}", failure_message(&output));
            return Ok(Vec::new());
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn current_session(&self) -> Option<String> {
        if !self.inside {
            return None;
        }
        let output = self
            .output(
                "display-message",
                &strings(&["display-message", "-p", "#{session_name}"]),
            )
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!name.is_empty()).then_some(name)
    }

    fn inside(&self) -> bool {
        self.inside
    }

    fn new_session(&self, name: &str, window: &Window, dir: &Path) -> Result<()> {
        debug!("Creating session {:?} in {}", name, dir.display());
        self.run(
            "new-session",
            &build_window_args(true, name, window, dir, &self.shell),
        )
    }

    fn new_window(&self, session: &str, window: &Window, dir: &Path) -> Result<()> {
        debug!("Adding window {:?} to {:?}", window.name, session);
        self.run(
            "new-window",
            &build_window_args(false, session, window, dir, &self.shell),
        )
    }

    fn switch_client(&self, target: &str) -> Result<()> {
        self.run("switch-client", &strings(&["switch-client", "-t", target]))
    }

    fn attach_session(&self, target: &str) -> Result<()> {
        // The client takes over the terminal, so stdio is inherited.
        let status = Command::new(&self.binary)
            .args(["attach-session", "-t", target])
            .status()
            .map_err(|e| {
                Error::multiplexer(
                    "attach-session",
                    format!("failed to run {}: {e}", self.binary),
                )
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::multiplexer("attach-session", status.to_string()))
        }
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        let target = format!("={name}");
        self.run("kill-session", &strings(&["kill-session", "-t", &target]))
    }

    fn kill_server(&self) -> Result<()> {
        self.run("kill-server", &strings(&["kill-server"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_window_args() {
        let args = build_window_args(
            true,
            "api",
            &Window::new("main"),
            Path::new("/srv/api"),
            "/bin/zsh",
        );
        assert_eq!(
            args,
            vec!["new-session", "-ds", "api", "-n", "main", "-c", "/srv/api"]
        );
    }

    #[test]
    fn test_later_window_args() {
        let args = build_window_args(
            false,
            "api",
            &Window::new("logs"),
            Path::new("/srv/api"),
            "/bin/zsh",
        );
        assert_eq!(
            args,
            vec!["new-window", "-t", "api", "-n", "logs", "-c", "/srv/api"]
        );
    }

    #[test]
    fn test_command_keeps_window_open() {
        let args = build_window_args(
            true,
            "api",
            &Window::with_command("edit", "nvim ."),
            Path::new("/srv/api"),
            "/bin/zsh",
        );
        assert_eq!(
            &args[7..],
            &["--", "/bin/zsh", "-lc", "nvim .; exec /bin/zsh"]
        );
    }

    #[test]
    fn test_blank_command_ignored() {
        let args = build_window_args(
            false,
            "api",
            &Window::with_command("term", "   "),
            Path::new("/srv/api"),
            DEFAULT_SHELL,
        );
        assert_eq!(args.len(), 7);
    }

    #[test]
    fn test_missing_binary() {
        let tmux = Tmux::from_env().with_binary("muxly-test-no-such-tmux");

        assert!(!tmux.is_available());
        assert!(!tmux.has_session("api"));
        assert!(tmux.list_sessions().is_err());
        assert!(matches!(
            tmux.kill_server(),
            Err(Error::Multiplexer { ref operation, .. }) if operation == "kill-server"
        ));
    }
}
