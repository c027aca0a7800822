//! One resolution pass: collect, label, merge.

use muxly_core::{Config, SessionTable};
use tracing::{debug, info};

use crate::collector::EntryCollector;
use crate::dedupe::deduplicate_display_names;
use crate::merge::EntryMap;
use crate::walker::DirectoryWalker;

/// Builds the picker's label table from configuration and live sessions.
pub struct EntryResolver<'a> {
    config: &'a Config,
    collector: EntryCollector<'a>,
}

impl<'a> EntryResolver<'a> {
    /// Create a resolver over a validated configuration.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            collector: EntryCollector::new(config),
        }
    }

    /// Use a custom walker for collection.
    pub fn with_walker(mut self, walker: DirectoryWalker) -> Self {
        self.collector = self.collector.with_walker(walker);
        self
    }

    /// Run collection, deduplication and the session merge.
    ///
    /// Never fails: unreadable roots and unresolvable paths are skipped with
    /// a warning during collection.
    pub async fn resolve(&self, flag_depth: usize, sessions: &SessionTable) -> EntryMap {
        debug!(
            "Resolving entries ({} ignored names, {} ignored paths)",
            self.collector.ignore_set().names.len(),
            self.collector.ignore_set().paths.len()
        );

        let dirs = self.collector.collect(flag_depth).await;
        let labels = deduplicate_display_names(&dirs);
        let map = EntryMap::merge(
            &dirs,
            &labels,
            sessions,
            &self.config.settings.tmux_session_prefix,
        );

        info!(
            "Resolved {} entries from {} directories and {} sessions",
            map.len(),
            dirs.len(),
            sessions.sessions.len()
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muxly_core::{DirEntry, EntryPath, ScanRoot, Target};
    use std::fs;

    #[tokio::test]
    async fn test_resolve_scan_and_entry_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        for dir in ["Dev/app", "Dev/app2", "Documents"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        let config = Config {
            scan_dirs: vec![ScanRoot::new(tmp.path().join("Dev").to_string_lossy())],
            entry_dirs: vec![EntryPath::new(tmp.path().join("Documents").to_string_lossy())],
            ..Config::default()
        };

        let map = EntryResolver::new(&config)
            .resolve(0, &SessionTable::default())
            .await;

        assert_eq!(map.picker_labels(), vec!["Documents", "app", "app2"]);
        assert_eq!(
            map.get("app"),
            Some(&Target::Path(DirEntry::new(tmp.path().join("Dev/app"))))
        );
    }

    #[tokio::test]
    async fn test_resolve_with_live_sessions() {
        let tmp = tempfile::tempdir().unwrap();
        for dir in ["Dev/api", "Dev/web"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        let config = Config {
            scan_dirs: vec![ScanRoot::new(tmp.path().join("Dev").to_string_lossy())],
            ..Config::default()
        };
        let sessions = SessionTable::new(["api", "notes"], Some("notes".to_string()));

        let map = EntryResolver::new(&config)
            .with_walker(DirectoryWalker::new(Vec::<String>::new()).with_workers(2))
            .resolve(0, &sessions)
            .await;

        assert_eq!(map.picker_labels(), vec!["[TMUX] api", "web"]);
    }

    #[tokio::test]
    async fn test_resolve_disambiguates_across_roots() {
        let tmp = tempfile::tempdir().unwrap();
        for dir in ["Dev/muxly", "Work/muxly"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        let config = Config {
            scan_dirs: vec![
                ScanRoot::new(tmp.path().join("Dev").to_string_lossy()),
                ScanRoot::new(tmp.path().join("Work").to_string_lossy()),
            ],
            ..Config::default()
        };

        let map = EntryResolver::new(&config)
            .resolve(0, &SessionTable::default())
            .await;

        assert_eq!(map.picker_labels(), vec!["Dev/muxly", "Work/muxly"]);
    }
}
