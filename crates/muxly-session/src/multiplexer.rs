//! The terminal multiplexer seam.
//!
//! Everything muxly asks of tmux goes through [`Multiplexer`], so the
//! lifecycle logic can be driven by a recording fake in tests.

use std::path::Path;

use muxly_core::{Result, SessionTable, Window};
use tracing::warn;

/// Primitive session operations of a terminal multiplexer.
///
/// Each call is one external command. Implementations do not retry; the
/// index fallback lives in the session manager.
pub trait Multiplexer {
    /// Whether a session with this exact name exists.
    fn has_session(&self, name: &str) -> bool;

    /// Names of all running sessions. No running server means no sessions.
    fn list_sessions(&self) -> Result<Vec<String>>;

    /// Session the invoking client is attached to, if running inside one.
    fn current_session(&self) -> Option<String>;

    /// Whether the invoking process runs inside the multiplexer.
    fn inside(&self) -> bool;

    /// Create a detached session whose first window is `window`.
    fn new_session(&self, name: &str, window: &Window, dir: &Path) -> Result<()>;

    /// Append a window to an existing session.
    fn new_window(&self, session: &str, window: &Window, dir: &Path) -> Result<()>;

    /// Point the current client at `target`.
    fn switch_client(&self, target: &str) -> Result<()>;

    /// Attach the terminal to `target`. Blocks until the client detaches.
    fn attach_session(&self, target: &str) -> Result<()>;

    /// Terminate one session.
    fn kill_session(&self, name: &str) -> Result<()>;

    /// Terminate the server and every session on it.
    fn kill_server(&self) -> Result<()>;

    /// Session names and the current session, taken together.
    fn snapshot(&self) -> SessionTable {
        let sessions = self.list_sessions().unwrap_or_else(|e| {
            warn!("Could not list sessions: {}", e);
            Vec::new()
        });
        SessionTable::new(sessions, self.current_session())
    }
}

impl<M: Multiplexer + ?Sized> Multiplexer for &M {
    fn has_session(&self, name: &str) -> bool {
        (**self).has_session(name)
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        (**self).list_sessions()
    }

    fn current_session(&self) -> Option<String> {
        (**self).current_session()
    }

    fn inside(&self) -> bool {
        (**self).inside()
    }

    fn new_session(&self, name: &str, window: &Window, dir: &Path) -> Result<()> {
        (**self).new_session(name, window, dir)
    }

    fn new_window(&self, session: &str, window: &Window, dir: &Path) -> Result<()> {
        (**self).new_window(session, window, dir)
    }

    fn switch_client(&self, target: &str) -> Result<()> {
        (**self).switch_client(target)
    }

    fn attach_session(&self, target: &str) -> Result<()> {
        (**self).attach_session(target)
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        (**self).kill_session(name)
    }

    fn kill_server(&self) -> Result<()> {
        (**self).kill_server()
    }
}

/// Target string for switching or attaching: `name:base` when the base
/// index is non-negative, else the bare name.
pub fn session_target(base: i32, name: &str) -> String {
    if base >= 0 {
        format!("{name}:{base}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Listing {
        sessions: Option<Vec<String>>,
        current: Option<String>,
        calls: RefCell<usize>,
    }

    impl Multiplexer for Listing {
        fn has_session(&self, _name: &str) -> bool {
            false
        }
        fn list_sessions(&self) -> Result<Vec<String>> {
            *self.calls.borrow_mut() += 1;
            self.sessions
                .clone()
                .ok_or_else(|| muxly_core::Error::multiplexer("list-sessions", "boom"))
        }
        fn current_session(&self) -> Option<String> {
            self.current.clone()
        }
        fn inside(&self) -> bool {
            self.current.is_some()
        }
        fn new_session(&self, _: &str, _: &Window, _: &Path) -> Result<()> {
            Ok(())
        }
        fn new_window(&self, _: &str, _: &Window, _: &Path) -> Result<()> {
            Ok(())
        }
        fn switch_client(&self, _: &str) -> Result<()> {
            Ok(())
        }
        fn attach_session(&self, _: &str) -> Result<()> {
            Ok(())
        }
        fn kill_session(&self, _: &str) -> Result<()> {
            Ok(())
        }
        fn kill_server(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_session_target() {
        assert_eq!(session_target(1, "api"), "api:1");
        assert_eq!(session_target(0, "api"), "api:0");
        assert_eq!(session_target(-1, "api"), "api");
    }

    #[test]
    fn test_snapshot() {
        let mux = Listing {
            sessions: Some(vec!["api".to_string(), "notes".to_string()]),
            current: Some("notes".to_string()),
            calls: RefCell::new(0),
        };
        let table = mux.snapshot();

        assert_eq!(*mux.calls.borrow(), 1);
        assert!(table.contains("api"));
        assert!(table.is_current("notes"));
        assert_eq!(table.others(), vec!["api".to_string()]);
    }

    #[test]
    fn test_snapshot_tolerates_listing_failure() {
        let mux = Listing {
            sessions: None,
            current: None,
            calls: RefCell::new(0),
        };
        assert_eq!(mux.snapshot(), SessionTable::default());
    }

    #[test]
    fn test_borrowed_multiplexer_delegates() {
        let mux = Listing {
            sessions: Some(vec!["api".to_string()]),
            current: None,
            calls: RefCell::new(0),
        };
        fn snapshot_of<M: Multiplexer>(mux: M) -> SessionTable {
            mux.snapshot()
        }
        let table = snapshot_of(&mux);

        assert_eq!(*mux.calls.borrow(), 1);
        assert!(table.contains("api"));
    }
}
