//! Testing utilities for session lifecycle code.
//!
//! [`RecordingMultiplexer`] keeps an in-memory session table and records
//! every mutating primitive, so lifecycle flows can be asserted without a
//! tmux server.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use muxly_core::{Error, Result, Window};

use crate::multiplexer::Multiplexer;
use crate::picker::{Picker, Selection};
use crate::prompt::Confirm;

/// A mutating primitive as it was invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `new-session`
    NewSession {
        /// Session name
        name: String,
        /// First window
        window: Window,
        /// Working directory
        dir: PathBuf,
    },
    /// `new-window`
    NewWindow {
        /// Session the window was added to
        session: String,
        /// The window
        window: Window,
        /// Working directory
        dir: PathBuf,
    },
    /// `switch-client -t target`
    SwitchClient(String),
    /// `attach-session -t target`
    AttachSession(String),
    /// `kill-session`
    KillSession(String),
    /// `kill-server`
    KillServer,
}

impl Call {
    /// Whether this call created a session.
    pub fn is_new_session(&self) -> bool {
        matches!(self, Call::NewSession { .. })
    }
}

#[derive(Debug, Default)]
struct State {
    sessions: BTreeSet<String>,
    current: Option<String>,
}

/// In-memory multiplexer that records what was asked of it.
#[derive(Debug, Default)]
pub struct RecordingMultiplexer {
    state: RefCell<State>,
    inside: bool,
    reject_indexed_targets: bool,
    calls: RefCell<Vec<Call>>,
}

impl RecordingMultiplexer {
    /// No server, invoked from outside the multiplexer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Running sessions, invoked from outside.
    pub fn with_sessions<I, S>(sessions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mux = Self::new();
        mux.state.borrow_mut().sessions = sessions.into_iter().map(Into::into).collect();
        mux
    }

    /// Invoked from a client attached to `current`, which is added to the
    /// session table.
    pub fn attached_to(mut self, current: impl Into<String>) -> Self {
        let current = current.into();
        {
            let mut state = self.state.borrow_mut();
            state.sessions.insert(current.clone());
            state.current = Some(current);
        }
        self.inside = true;
        self
    }

    /// Make `name:index` targets fail, as they do when the window index
    /// does not exist.
    pub fn rejecting_indexed_targets(mut self) -> Self {
        self.reject_indexed_targets = true;
        self
    }

    /// Every mutating call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Running sessions now.
    pub fn sessions(&self) -> Vec<String> {
        self.state.borrow().sessions.iter().cloned().collect()
    }

    /// The session the fake client is on now.
    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn enter(&self, operation: &str, target: &str) -> Result<()> {
        let name = match target.split_once(':') {
            Some(_) if self.reject_indexed_targets => {
                return Err(Error::multiplexer(operation, "can't find window"));
            }
            Some((name, _)) => name,
            None => target,
        };
        let mut state = self.state.borrow_mut();
        if !state.sessions.contains(name) {
            return Err(Error::multiplexer(operation, format!("can't find session: {name}")));
        }
        state.current = Some(name.to_string());
        Ok(())
    }
}

impl Multiplexer for RecordingMultiplexer {
    fn has_session(&self, name: &str) -> bool {
        self.state.borrow().sessions.contains(name)
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(self.sessions())
    }

    fn current_session(&self) -> Option<String> {
        if self.inside {
            self.current()
        } else {
            None
        }
    }

    fn inside(&self) -> bool {
        self.inside
    }

    fn new_session(&self, name: &str, window: &Window, dir: &Path) -> Result<()> {
        self.record(Call::NewSession {
            name: name.to_string(),
            window: window.clone(),
            dir: dir.to_path_buf(),
        });
        if !self.state.borrow_mut().sessions.insert(name.to_string()) {
            return Err(Error::multiplexer("new-session", format!("duplicate session: {name}")));
        }
        Ok(())
    }

    fn new_window(&self, session: &str, window: &Window, dir: &Path) -> Result<()> {
        self.record(Call::NewWindow {
            session: session.to_string(),
            window: window.clone(),
            dir: dir.to_path_buf(),
        });
        if !self.has_session(session) {
            return Err(Error::multiplexer("new-window", format!("can't find session: {session}")));
        }
        Ok(())
    }

    fn switch_client(&self, target: &str) -> Result<()> {
        self.record(Call::SwitchClient(target.to_string()));
        self.enter("switch-client", target)
    }

    fn attach_session(&self, target: &str) -> Result<()> {
        self.record(Call::AttachSession(target.to_string()));
        self.enter("attach-session", target)
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        self.record(Call::KillSession(name.to_string()));
        let mut state = self.state.borrow_mut();
        if !state.sessions.remove(name) {
            return Err(Error::multiplexer("kill-session", format!("can't find session: {name}")));
        }
        if state.current.as_deref() == Some(name) {
            state.current = None;
        }
        Ok(())
    }

    fn kill_server(&self) -> Result<()> {
        self.record(Call::KillServer);
        let mut state = self.state.borrow_mut();
        state.sessions.clear();
        state.current = None;
        Ok(())
    }
}

/// Picker with a canned answer that remembers what it was shown.
#[derive(Debug)]
pub struct ScriptedPicker {
    answer: Selection,
    shown: RefCell<Option<Vec<String>>>,
}

impl ScriptedPicker {
    /// Always choose `label`.
    pub fn choosing(label: impl Into<String>) -> Self {
        Self {
            answer: Selection::Chosen(label.into()),
            shown: RefCell::new(None),
        }
    }

    /// Always cancel.
    pub fn cancelling() -> Self {
        Self {
            answer: Selection::Cancelled,
            shown: RefCell::new(None),
        }
    }

    /// Labels from the last run, if it ran.
    pub fn shown(&self) -> Option<Vec<String>> {
        self.shown.borrow().clone()
    }
}

impl Picker for ScriptedPicker {
    fn pick(&self, labels: &[String]) -> Result<Selection> {
        *self.shown.borrow_mut() = Some(labels.to_vec());
        Ok(self.answer.clone())
    }
}

/// Confirmation with a fixed reply that remembers every question asked.
#[derive(Debug)]
pub struct ScriptedConfirm {
    reply: bool,
    asked: RefCell<Vec<String>>,
}

impl ScriptedConfirm {
    /// Reply `reply` to everything.
    pub fn replying(reply: bool) -> Self {
        Self {
            reply,
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far, oldest first.
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, question: &str) -> bool {
        self.asked.borrow_mut().push(question.to_string());
        self.reply
    }
}

