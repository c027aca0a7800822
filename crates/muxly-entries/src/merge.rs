//! Merging collected directories with live sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use muxly_core::{session_name_for, DirEntry, SessionTable, Target};
use tracing::debug;

/// Picker label to target mapping for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMap {
    entries: BTreeMap<String, Target>,
    session_prefix: String,
}

impl EntryMap {
    /// Merge labelled directories with the session snapshot.
    ///
    /// Every session except the invoker's own is added as
    /// `session_prefix + name`. A directory whose label would open a live
    /// session (the current one included) is dropped: the session wins.
    /// Directories without a label are skipped.
    pub fn merge(
        dirs: &[DirEntry],
        labels: &BTreeMap<PathBuf, String>,
        sessions: &SessionTable,
        session_prefix: &str,
    ) -> Self {
        let mut entries = BTreeMap::new();

        for dir in dirs {
            let Some(label) = labels.get(&dir.path) else {
                continue;
            };
            let session = session_name_for(label);
            if sessions.contains(&session) || sessions.is_current(&session) {
                debug!(
                    "Dropping {} in favour of live session {:?}",
                    dir.path.display(),
                    label
                );
                continue;
            }
            entries.insert(label.clone(), Target::Path(dir.clone()));
        }

        for name in sessions.others() {
            entries.insert(
                format!("{session_prefix}{name}"),
                Target::ExistingSession(name),
            );
        }

        Self {
            entries,
            session_prefix: session_prefix.to_string(),
        }
    }

    /// Target for an exact label.
    pub fn get(&self, label: &str) -> Option<&Target> {
        self.entries.get(label)
    }

    /// Resolve a picker choice or a name typed on the command line.
    ///
    /// An exact label wins; otherwise a bare live-session name is accepted.
    pub fn lookup(&self, choice: &str) -> Option<&Target> {
        self.entries.get(choice).or_else(|| {
            self.entries
                .get(&format!("{}{}", self.session_prefix, choice))
                .filter(|t| t.is_existing_session())
        })
    }

    /// Labels in picker order: live sessions first, then the rest, each
    /// alphabetical.
    pub fn picker_labels(&self) -> Vec<String> {
        let (sessions, dirs): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .partition(|(_, target)| target.is_existing_session());
        sessions
            .into_iter()
            .chain(dirs)
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to pick.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate labels and targets in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Target)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labelled(paths: &[(&str, &str)]) -> (Vec<DirEntry>, BTreeMap<PathBuf, String>) {
        let dirs = paths.iter().map(|(p, _)| DirEntry::new(*p)).collect();
        let labels = paths
            .iter()
            .map(|(p, l)| (PathBuf::from(p), l.to_string()))
            .collect();
        (dirs, labels)
    }

    #[test]
    fn test_merge_without_sessions() {
        let (dirs, labels) = labelled(&[("/Dev/app", "app"), ("/Dev/app2", "app2")]);
        let map = EntryMap::merge(&dirs, &labels, &SessionTable::default(), "[TMUX] ");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("app"), Some(&Target::Path(DirEntry::new("/Dev/app"))));
    }

    #[test]
    fn test_live_session_wins_collision() {
        let (dirs, labels) = labelled(&[("/Dev/api", "api"), ("/Dev/web", "web")]);
        let sessions = SessionTable::new(["api"], None);
        let map = EntryMap::merge(&dirs, &labels, &sessions, "[TMUX] ");

        assert!(map.get("api").is_none());
        assert_eq!(
            map.get("[TMUX] api"),
            Some(&Target::ExistingSession("api".to_string()))
        );
        assert!(map.get("web").is_some());
    }

    #[test]
    fn test_live_session_wins_by_session_name() {
        let (dirs, labels) = labelled(&[("/p/a.b/x", "p/a.b/x"), ("/q/a_b/x", "q/a_b/x")]);
        let sessions = SessionTable::new(["p/a_b/x"], None);
        let map = EntryMap::merge(&dirs, &labels, &sessions, "[TMUX] ");

        assert!(map.get("p/a.b/x").is_none());
        assert!(map.get("[TMUX] p/a_b/x").is_some());
        assert_eq!(
            map.get("q/a_b/x"),
            Some(&Target::Path(DirEntry::new("/q/a_b/x")))
        );
    }

    #[test]
    fn test_current_session_excluded() {
        let (dirs, labels) = labelled(&[("/Dev/notes", "notes"), ("/Dev/web", "web")]);
        let sessions = SessionTable::new(["notes", "work"], Some("notes".to_string()));
        let map = EntryMap::merge(&dirs, &labels, &sessions, "[TMUX] ");

        assert!(map.get("notes").is_none());
        assert!(map.get("[TMUX] notes").is_none());
        assert!(map.get("[TMUX] work").is_some());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_picker_order_sessions_first() {
        let (dirs, labels) = labelled(&[("/Dev/alpha", "alpha"), ("/Dev/zeta", "zeta")]);
        let sessions = SessionTable::new(["beta", "aardvark"], None);
        let map = EntryMap::merge(&dirs, &labels, &sessions, "[TMUX] ");

        assert_eq!(
            map.picker_labels(),
            vec!["[TMUX] aardvark", "[TMUX] beta", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_lookup_bare_session_name() {
        let (dirs, labels) = labelled(&[("/Dev/web", "web")]);
        let sessions = SessionTable::new(["api"], None);
        let map = EntryMap::merge(&dirs, &labels, &sessions, "[TMUX] ");

        assert_eq!(
            map.lookup("api"),
            Some(&Target::ExistingSession("api".to_string()))
        );
        assert_eq!(
            map.lookup("[TMUX] api"),
            Some(&Target::ExistingSession("api".to_string()))
        );
        assert!(map.lookup("web").is_some());
        assert!(map.lookup("nope").is_none());
    }

    #[test]
    fn test_empty_prefix() {
        let (dirs, labels) = labelled(&[("/Dev/api", "api")]);
        let sessions = SessionTable::new(["api"], None);
        let map = EntryMap::merge(&dirs, &labels, &sessions, "");

        assert_eq!(map.len(), 1);
        assert!(map.get("api").unwrap().is_existing_session());
    }
}
