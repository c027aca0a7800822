//! Display-name deduplication.
//!
//! Every collected directory gets the shortest label that tells it apart
//! from the others. A label starts as the sanitised basename and is widened
//! one path component at a time, only for the entries that actually collide.
//! Aliases are applied only while widening, never to a name that is already
//! unique.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use muxly_core::{session_name_for, DirEntry};
use tracing::debug;

use crate::names::{
    apply_prefix, basename, dotdir_suffix, path_suffix, sanitize_path_for_display,
    sanitize_session_name,
};

/// Widest level tried before falling back to full paths.
pub const MAX_WIDENING_LEVEL: usize = 10;

struct Candidate<'a> {
    entry: &'a DirEntry,
    name: String,
    dots: usize,
}

impl Candidate<'_> {
    fn path_text(&self) -> String {
        self.entry.path.to_string_lossy().into_owned()
    }

    /// Label at widening level `level`, dotdir marker included. Level 0 is
    /// the bare name with no alias.
    fn label_at(&self, level: usize) -> String {
        let prefix = self.entry.prefix.as_str();
        let base = if level == 0 {
            self.name.clone()
        } else if level == 1 {
            apply_prefix(prefix, &self.name)
        } else if prefix.is_empty() {
            sanitize_path_for_display(&path_suffix(&self.path_text(), level))
        } else {
            apply_prefix(
                prefix,
                &sanitize_path_for_display(&path_suffix(&self.path_text(), level - 1)),
            )
        };
        base + &dotdir_suffix(self.dots)
    }
}

/// Map each entry's path to a unique display label.
///
/// The result has exactly one label per distinct input path and depends
/// only on the set of entries, not on their order. When the same path is
/// given twice, the smaller entry wins. Labels are distinct as tmux session
/// names, not just as text (see [`session_name_for`]).
pub fn deduplicate_display_names(entries: &[DirEntry]) -> BTreeMap<PathBuf, String> {
    let mut by_path: BTreeMap<&PathBuf, &DirEntry> = BTreeMap::new();
    for entry in entries {
        by_path
            .entry(&entry.path)
            .and_modify(|kept| {
                if entry < *kept {
                    *kept = entry;
                }
            })
            .or_insert(entry);
    }

    // Entries that differ in leading dots carry different markers, so each
    // dot count is resolved on its own.
    let mut groups: BTreeMap<(String, usize), Vec<Candidate<'_>>> = BTreeMap::new();
    for entry in by_path.into_values() {
        let (name, dots) = sanitize_session_name(&basename(&entry.path));
        groups
            .entry((name.clone(), dots))
            .or_default()
            .push(Candidate { entry, name, dots });
    }

    let mut labels = BTreeMap::new();
    for ((name, dots), group) in groups {
        if let [only] = group.as_slice() {
            labels.insert(only.entry.path.clone(), only.label_at(0));
            continue;
        }
        debug!(
            "Disambiguating {} entries named {:?} ({} leading dots)",
            group.len(),
            name,
            dots
        );
        labels.extend(disambiguate(&group));
    }

    ensure_unique(labels)
}

fn disambiguate(group: &[Candidate<'_>]) -> Vec<(PathBuf, String)> {
    for level in 1..=MAX_WIDENING_LEVEL {
        let labels: Vec<String> = group.iter().map(|c| c.label_at(level)).collect();
        let sessions: BTreeSet<String> = labels.iter().map(|l| session_name_for(l)).collect();
        if sessions.len() == labels.len() {
            return group
                .iter()
                .map(|c| c.entry.path.clone())
                .zip(labels)
                .collect();
        }
    }
    full_paths(group)
}

fn full_paths(group: &[Candidate<'_>]) -> Vec<(PathBuf, String)> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    group
        .iter()
        .map(|c| {
            let mut label = sanitize_path_for_display(&c.path_text()) + &dotdir_suffix(c.dots);
            let count = seen.entry(session_name_for(&label)).or_insert(0);
            *count += 1;
            if *count > 1 {
                label = format!("{label} ({count})");
            }
            (c.entry.path.clone(), label)
        })
        .collect()
}

/// Groups are resolved independently, so a label from one group can still
/// clash with a label from another (a directory literally named
/// `foo [dotdir]`). Later paths get a numeric suffix.
fn ensure_unique(labels: BTreeMap<PathBuf, String>) -> BTreeMap<PathBuf, String> {
    let mut taken: BTreeSet<String> = BTreeSet::new();
    let mut unique = BTreeMap::new();

    for (path, label) in labels {
        let mut candidate = label.clone();
        let mut n = 2;
        while taken.contains(&session_name_for(&candidate)) {
            candidate = format!("{label} ({n})");
            n += 1;
        }
        taken.insert(session_name_for(&candidate));
        unique.insert(path, candidate);
    }

    unique
}
