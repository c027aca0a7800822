//! Session lifecycle: create, switch and kill.
//!
//! A picked [`Target`] is first resolved into either a session that already
//! runs or a [`SessionSpec`] still to be created, then opened. Opening ends
//! with the client on the session ([`Activation`]) or with an error.
//! Killing is a separate flow that may move the client elsewhere before the
//! session goes away.

use std::path::PathBuf;

use muxly_core::{resolve_path, session_name_for, Config, Error, Result, Target, Window};
use tracing::{debug, info, warn};

use crate::multiplexer::{session_target, Multiplexer};
use crate::picker::{Picker, Selection};
use crate::prompt::Confirm;

/// Everything needed to create a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    /// Session name
    pub name: String,
    /// Working directory for every window
    pub dir: PathBuf,
    /// Windows in creation order; the first one starts the session
    pub windows: Vec<Window>,
}

/// What opening a target will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The session runs already; only switch to it
    Existing(String),
    /// The session must be created first
    NeedsCreation(SessionSpec),
}

/// The client is now on this session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Session name
    pub session: String,
    /// Whether it was created by this call
    pub created: bool,
}

/// Which session to kill and where to go instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillRequest {
    /// Session to kill; `None` means the invoker's own
    pub target: Option<String>,
    /// Session to move to when the invoker's own is killed
    pub replacement: Option<String>,
}

impl KillRequest {
    /// Kill the invoker's own session.
    pub fn current() -> Self {
        Self::default()
    }

    /// Kill a named session.
    pub fn session(name: impl Into<String>) -> Self {
        Self {
            target: Some(name.into()),
            replacement: None,
        }
    }

    /// Move to `name` instead of asking.
    pub fn with_replacement(mut self, name: impl Into<String>) -> Self {
        self.replacement = Some(name.into());
        self
    }
}

/// How a kill request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillOutcome {
    /// The session was killed; nothing else changed
    Killed(String),
    /// The client moved to another live session, then the session was killed
    Replaced {
        /// Session that was killed
        killed: String,
        /// Session the client is on now
        replacement: String,
    },
    /// No session was left, so the primary template's session took over
    FellBack {
        /// Session that was killed
        killed: String,
        /// Fallback session the client is on now
        fallback: String,
    },
    /// The whole server was terminated
    ServerKilled,
    /// The user declined; nothing changed
    Aborted,
}

/// Drives session operations through a [`Multiplexer`].
pub struct SessionManager<'a, M: Multiplexer> {
    mux: M,
    config: &'a Config,
}

impl<'a, M: Multiplexer> SessionManager<'a, M> {
    /// Create a manager over a multiplexer and a validated configuration.
    pub fn new(mux: M, config: &'a Config) -> Self {
        Self { mux, config }
    }

    /// The underlying multiplexer.
    pub fn multiplexer(&self) -> &M {
        &self.mux
    }

    /// Decide what opening `target` under `label` takes.
    ///
    /// `layout` is the directory's own window list (see
    /// [`load_layout`](crate::layout_file::load_layout)); when given it
    /// replaces the entry's template.
    pub fn resolve(
        &self,
        label: &str,
        target: &Target,
        layout: Option<Vec<Window>>,
    ) -> Result<Resolution> {
        match target {
            Target::ExistingSession(name) => Ok(Resolution::Existing(name.clone())),
            Target::Path(entry) => {
                let name = session_name_for(label);
                if self.mux.has_session(&name) {
                    debug!("Session {:?} already exists", name);
                    return Ok(Resolution::Existing(name));
                }

                let windows = match layout {
                    Some(windows) => windows,
                    None => self
                        .config
                        .template_for(entry.template.as_deref())?
                        .windows
                        .clone(),
                };

                Ok(Resolution::NeedsCreation(SessionSpec {
                    name,
                    dir: entry.path.clone(),
                    windows,
                }))
            }
        }
    }

    /// Carry out a resolution: create if needed, then switch.
    pub fn open(&self, resolution: Resolution) -> Result<Activation> {
        match resolution {
            Resolution::Existing(name) => {
                self.switch(&name)?;
                Ok(Activation {
                    session: name,
                    created: false,
                })
            }
            Resolution::NeedsCreation(spec) => {
                self.create(&spec)?;
                self.switch(&spec.name)?;
                Ok(Activation {
                    session: spec.name,
                    created: true,
                })
            }
        }
    }

    /// Resolve and open in one step.
    pub fn launch(
        &self,
        label: &str,
        target: &Target,
        layout: Option<Vec<Window>>,
    ) -> Result<Activation> {
        let resolution = self.resolve(label, target, layout)?;
        self.open(resolution)
    }

    /// Create a session: the first window via `new-session`, the rest via
    /// `new-window`, in order.
    pub fn create(&self, spec: &SessionSpec) -> Result<()> {
        let (first, rest) = spec
            .windows
            .split_first()
            .ok_or_else(|| Error::NoWindows(spec.name.clone()))?;

        info!(
            "Creating session {:?} in {} with {} windows",
            spec.name,
            spec.dir.display(),
            spec.windows.len()
        );
        self.mux.new_session(&spec.name, first, &spec.dir)?;
        for window in rest {
            self.mux.new_window(&spec.name, window, &spec.dir)?;
        }
        Ok(())
    }

    /// Put the client on a running session.
    ///
    /// Inside tmux the client is switched, outside it is attached. The
    /// configured window index is tried first; if that target is rejected
    /// the bare session name is tried once more.
    pub fn switch(&self, name: &str) -> Result<()> {
        if !self.mux.has_session(name) {
            return Err(Error::NoSuchEntry(name.to_string()));
        }

        let enter = |target: &str| {
            if self.mux.inside() {
                self.mux.switch_client(target)
            } else {
                self.mux.attach_session(target)
            }
        };

        let target = session_target(self.config.settings.tmux_base, name);
        info!("Switching to {}", target);
        match enter(&target) {
            Ok(()) => Ok(()),
            Err(e) if target != name => {
                warn!("{}; retrying with session {:?}", e, name);
                enter(name)
            }
            Err(e) => Err(e),
        }
    }

    /// Switch to the primary template's session, creating it if needed.
    pub fn open_fallback(&self) -> Result<Activation> {
        let template = self.config.primary_template()?;
        let name = session_name_for(&template.name);

        if self.mux.has_session(&name) {
            return self.open(Resolution::Existing(name));
        }

        let dir = resolve_path(template.path_or_home())?;
        self.open(Resolution::NeedsCreation(SessionSpec {
            name,
            dir,
            windows: template.windows.clone(),
        }))
    }

    /// Kill a session, keeping the client somewhere sensible.
    ///
    /// - No target and not inside tmux: confirm, then kill the server.
    /// - The invoker's own session with others alive: move to the
    ///   replacement (asked via `picker` unless given), then kill.
    /// - The invoker's own, last session: kill the server when
    ///   `always_kill_on_last_session` is set; otherwise confirm a fallback
    ///   to the primary template's session, and kill the server if declined.
    ///   When that session is the one being killed, confirm killing the
    ///   server instead.
    /// - Any other session: kill it, or the server when it is the last one
    ///   and `always_kill_on_last_session` is set.
    pub fn kill(
        &self,
        request: KillRequest,
        picker: &dyn Picker,
        confirm: &dyn Confirm,
    ) -> Result<KillOutcome> {
        let table = self.mux.snapshot();
        let always_kill = self.config.settings.always_kill_on_last_session;

        let Some(target) = request.target.or_else(|| table.current.clone()) else {
            if !confirm.confirm("Kill the tmux server?") {
                return Ok(KillOutcome::Aborted);
            }
            return self.kill_server();
        };

        if !table.contains(&target) {
            return Err(Error::NoSuchEntry(target));
        }

        let others: Vec<String> = table
            .sessions
            .iter()
            .filter(|name| **name != target)
            .cloned()
            .collect();

        if !table.is_current(&target) {
            if others.is_empty() && always_kill {
                return self.kill_server();
            }
            info!("Killing session {:?}", target);
            self.mux.kill_session(&target)?;
            return Ok(KillOutcome::Killed(target));
        }

        if !others.is_empty() {
            let replacement = match request.replacement {
                Some(name) => name,
                None => match picker.pick(&others)? {
                    Selection::Chosen(name) => name,
                    Selection::Cancelled => return Ok(KillOutcome::Aborted),
                },
            };
            if replacement == target {
                return Err(Error::Config(format!(
                    "cannot replace session {target:?} with itself"
                )));
            }
            self.switch(&replacement)?;
            info!("Killing session {:?}", target);
            self.mux.kill_session(&target)?;
            return Ok(KillOutcome::Replaced {
                killed: target,
                replacement,
            });
        }

        if always_kill {
            return self.kill_server();
        }

        let template = self.config.primary_template()?;
        let fallback = session_name_for(&template.name);
        if fallback == target {
            if !confirm.confirm("No other sessions. Kill the tmux server?") {
                return Ok(KillOutcome::Aborted);
            }
            return self.kill_server();
        }
        let question = format!("No other sessions. Fall back to session '{fallback}'?");
        if !confirm.confirm(&question) {
            return self.kill_server();
        }

        let activation = self.open_fallback()?;
        info!("Killing session {:?}", target);
        self.mux.kill_session(&target)?;
        Ok(KillOutcome::FellBack {
            killed: target,
            fallback: activation.session,
        })
    }

    fn kill_server(&self) -> Result<KillOutcome> {
        info!("Killing the tmux server");
        self.mux.kill_server()?;
        Ok(KillOutcome::ServerKilled)
    }
}
