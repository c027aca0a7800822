//! Entry collection across scan roots and entry dirs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use muxly_core::config::BUILTIN_IGNORE_NAMES;
use muxly_core::{is_path_like, resolve_path, Config, DirEntry};
use tracing::{debug, info, warn};

use crate::walker::DirectoryWalker;

/// Ignore rules split by how they match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    /// Bare directory names, pruned at any depth during the walk
    pub names: HashSet<String>,
    /// Resolved absolute paths, dropped only at that exact location
    pub paths: HashSet<PathBuf>,
}

impl IgnoreSet {
    /// Build from configuration. The built-in names are always present.
    ///
    /// Path-like entries that fail to resolve are logged and skipped.
    pub fn from_config(config: &Config) -> Self {
        let mut set = Self {
            names: BUILTIN_IGNORE_NAMES.iter().map(|n| n.to_string()).collect(),
            paths: HashSet::new(),
        };

        for entry in &config.ignore_dirs {
            if is_path_like(entry) {
                match resolve_path(entry) {
                    Ok(path) => {
                        set.paths.insert(path);
                    }
                    Err(e) => warn!("Ignoring unresolvable ignore_dirs entry {:?}: {}", entry, e),
                }
            } else {
                set.names.insert(entry.clone());
            }
        }

        set
    }

    /// Whether a collected path is excluded by location.
    pub fn ignores_path(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// Walks every configured scan root and gathers entry dirs.
pub struct EntryCollector<'a> {
    config: &'a Config,
    ignore: IgnoreSet,
    walker: DirectoryWalker,
}

impl<'a> EntryCollector<'a> {
    /// Create a collector for a validated configuration.
    pub fn new(config: &'a Config) -> Self {
        let ignore = IgnoreSet::from_config(config);
        let walker = DirectoryWalker::new(ignore.names.iter().cloned());
        Self {
            config,
            ignore,
            walker,
        }
    }

    /// Replace the walker, e.g. to change its worker count.
    pub fn with_walker(mut self, walker: DirectoryWalker) -> Self {
        self.walker = walker;
        self
    }

    /// The ignore rules in effect.
    pub fn ignore_set(&self) -> &IgnoreSet {
        &self.ignore
    }

    /// Collect candidate directories.
    ///
    /// Scan roots are walked in configuration order, then entry dirs are
    /// appended. `flag_depth` overrides every root's depth when non-zero.
    /// A path seen twice keeps its first tags. Unresolvable or unreadable
    /// roots are logged and skipped.
    pub async fn collect(&self, flag_depth: usize) -> Vec<DirEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut push = |entry: DirEntry| {
            if self.ignore.ignores_path(&entry.path) {
                debug!("Ignored {}", entry.path.display());
                return;
            }
            if seen.insert(entry.path.clone()) {
                entries.push(entry);
            }
        };

        for scan in &self.config.scan_dirs {
            let root = match resolve_path(&scan.path) {
                Ok(root) => root,
                Err(e) => {
                    warn!("Skipping scan_dir {:?}: {}", scan.path, e);
                    continue;
                }
            };
            let depth = scan.effective_depth(flag_depth, self.config.settings.default_depth);

            let dirs = match self.walker.walk(&root, depth).await {
                Ok(dirs) => dirs,
                Err(e) => {
                    warn!("Skipping scan_dir {:?}: {}", scan.path, e);
                    continue;
                }
            };
            info!(
                "Scanned {} at depth {}: {} directories",
                root.display(),
                depth,
                dirs.len()
            );

            let mut dirs = dirs;
            dirs.sort();
            let prefix = scan.alias().unwrap_or_default();
            for dir in dirs {
                push(
                    DirEntry::new(dir)
                        .with_prefix(prefix)
                        .with_template(scan.template.clone()),
                );
            }
        }

        for entry_dir in &self.config.entry_dirs {
            let path = match resolve_path(&entry_dir.path) {
                Ok(path) => path,
                Err(e) => {
                    warn!("Skipping entry_dir {:?}: {}", entry_dir.path, e);
                    continue;
                }
            };
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_dir() => {
                    push(DirEntry::new(path).with_template(entry_dir.template.clone()))
                }
                Ok(_) => warn!("Skipping entry_dir {}: not a directory", path.display()),
                Err(e) => warn!("Skipping entry_dir {}: {}", path.display(), e),
            }
        }

        entries
    }
}
