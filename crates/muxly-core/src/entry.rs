//! Entry types produced by directory collection and consumed by the picker.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// A candidate directory produced by collection.
///
/// Rebuilt on every invocation and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirEntry {
    /// Resolved absolute path
    pub path: PathBuf,
    /// Alias prefix of the scan root this entry came from (may be empty)
    pub prefix: String,
    /// Template reference, if the scan root or entry dir named one
    pub template: Option<String>,
}

impl DirEntry {
    /// Create an untagged entry for a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            prefix: String::new(),
            template: None,
        }
    }

    /// Set the alias prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the template reference.
    pub fn with_template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }

    /// Borrow the path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// tmux session name for a picker label.
///
/// Labels only sanitise their last component, so any `.` or `:` left in a
/// widened label is rewritten the same way before tmux sees it. Two labels
/// are only distinct if their session names are.
pub fn session_name_for(label: &str) -> String {
    label.replace('.', "_").replace(':', "-")
}

/// What a picker label points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A directory; selecting it creates (or reuses) a session there
    Path(DirEntry),
    /// A live multiplexer session; selecting it switches to it
    ExistingSession(String),
}

impl Target {
    /// Whether this target is a running session.
    pub fn is_existing_session(&self) -> bool {
        matches!(self, Target::ExistingSession(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Path(entry) => write!(f, "{}", entry.path.display()),
            Target::ExistingSession(name) => write!(f, "session {name}"),
        }
    }
}

/// Snapshot of the multiplexer's session table taken once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTable {
    /// Names of all running sessions
    pub sessions: BTreeSet<String>,
    /// Session the invoking process is attached to, if any
    pub current: Option<String>,
}

impl SessionTable {
    /// Build a snapshot from a list of names and the current session.
    pub fn new<I, S>(sessions: I, current: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sessions: sessions.into_iter().map(Into::into).collect(),
            current,
        }
    }

    /// Whether a session with this name is running.
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.contains(name)
    }

    /// Whether `name` is the invoker's own session.
    pub fn is_current(&self, name: &str) -> bool {
        self.current.as_deref() == Some(name)
    }

    /// Running sessions other than the invoker's own, in name order.
    pub fn others(&self) -> Vec<String> {
        self.sessions
            .iter()
            .filter(|name| !self.is_current(name))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_builder() {
        let entry = DirEntry::new("/home/user/Dev/app")
            .with_prefix("dev")
            .with_template(Some("code".to_string()));
        assert_eq!(entry.path(), Path::new("/home/user/Dev/app"));
        assert_eq!(entry.prefix, "dev");
        assert_eq!(entry.template.as_deref(), Some("code"));
    }

    #[test]
    fn test_session_name_for() {
        assert_eq!(session_name_for("app"), "app");
        assert_eq!(session_name_for("my.org/app"), "my_org/app");
        assert_eq!(session_name_for("a:b/config [dotdir]"), "a-b/config [dotdir]");
        assert_eq!(session_name_for("a.b/x"), session_name_for("a_b/x"));
    }

    #[test]
    fn test_target_kind() {
        assert!(Target::ExistingSession("api".to_string()).is_existing_session());
        assert!(!Target::Path(DirEntry::new("/srv/api")).is_existing_session());
    }

    #[test]
    fn test_target_display() {
        assert_eq!(
            Target::Path(DirEntry::new("/srv/api")).to_string(),
            "/srv/api"
        );
        assert_eq!(
            Target::ExistingSession("api".to_string()).to_string(),
            "session api"
        );
    }

    #[test]
    fn test_session_table_others() {
        let table = SessionTable::new(["work", "notes", "api"], Some("notes".to_string()));
        assert!(table.contains("api"));
        assert!(table.is_current("notes"));
        assert!(!table.is_current("api"));
        assert_eq!(table.others(), vec!["api".to_string(), "work".to_string()]);
    }

    #[test]
    fn test_session_table_outside_multiplexer() {
        let table = SessionTable::new(["work"], None);
        assert_eq!(table.others(), vec!["work".to_string()]);
    }
}
