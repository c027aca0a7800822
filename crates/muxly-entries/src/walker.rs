//! Bounded-depth concurrent directory traversal.
//!
//! Directory reads run as tasks on a [`JoinSet`], at most `workers` at a time
//! (gated by a [`Semaphore`]). Every directory found is sent through a bounded
//! channel to a single collector task. [`DirectoryWalker::walk`] returns once
//! all reads are joined and the channel is drained.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use muxly_core::{Error, Result};

/// Capacity of the channel between readers and the collector.
pub const RESULT_CHANNEL_CAPACITY: usize = 100;

/// Walks a root directory, yielding subdirectories up to a maximum depth.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    ignore_names: Arc<HashSet<String>>,
    workers: usize,
}

impl DirectoryWalker {
    /// Create a walker that prunes directories with any of these names.
    pub fn new<I, S>(ignore_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_names: Arc::new(ignore_names.into_iter().map(Into::into).collect()),
            workers: default_workers(),
        }
    }

    /// Set the number of concurrent directory reads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Number of concurrent directory reads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Collect every directory below `root` within `max_depth` levels.
    ///
    /// Depth 1 yields the root's immediate children; depth 0 yields nothing.
    /// The root itself is never yielded, symlinks are not followed, and an
    /// ignored name prunes its whole subtree. Results are unordered.
    ///
    /// Only a root that cannot be read is an error; unreadable directories
    /// below it are logged and skipped.
    pub async fn walk(&self, root: &Path, max_depth: usize) -> Result<Vec<PathBuf>> {
        let walk_error = |source| Error::Walk {
            root: root.to_path_buf(),
            source,
        };

        let metadata = tokio::fs::metadata(root).await.map_err(walk_error)?;
        if !metadata.is_dir() {
            return Err(walk_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a directory",
            )));
        }

        let top = read_subdirs(root, &self.ignore_names)
            .await
            .map_err(walk_error)?;
        if max_depth == 0 {
            return Ok(Vec::new());
        }

        let (tx, mut rx) = mpsc::channel::<PathBuf>(RESULT_CHANNEL_CAPACITY);
        let collector = tokio::spawn(async move {
            let mut dirs = Vec::new();
            while let Some(dir) = rx.recv().await {
                dirs.push(dir);
            }
            dirs
        });

        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for dir in top {
            if tx.send(dir.clone()).await.is_err() {
                break;
            }
            if max_depth > 1 {
                tasks.spawn(scan(
                    dir,
                    2,
                    Arc::clone(&self.ignore_names),
                    tx.clone(),
                    Arc::clone(&permits),
                ));
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((level, children)) if level < max_depth => {
                    for child in children {
                        tasks.spawn(scan(
                            child,
                            level + 1,
                            Arc::clone(&self.ignore_names),
                            tx.clone(),
                            Arc::clone(&permits),
                        ));
                    }
                }
                Ok(_) => {}
                Err(e) => warn!("Directory read task failed under {}: {}", root.display(), e),
            }
        }

        drop(tx);
        let dirs = collector
            .await
            .map_err(|e| walk_error(io::Error::other(e.to_string())))?;

        debug!(
            "Walked {} (depth {}): {} directories",
            root.display(),
            max_depth,
            dirs.len()
        );
        Ok(dirs)
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(2)
}

/// Read `dir`, report its subdirectories (which sit at `level`), and hand
/// them back so the caller can descend further.
async fn scan(
    dir: PathBuf,
    level: usize,
    ignore: Arc<HashSet<String>>,
    tx: mpsc::Sender<PathBuf>,
    permits: Arc<Semaphore>,
) -> (usize, Vec<PathBuf>) {
    // The semaphore is never closed, so acquiring only waits.
    let _permit = permits.acquire_owned().await.ok();

    match read_subdirs(&dir, &ignore).await {
        Ok(children) => {
            for child in &children {
                if tx.send(child.clone()).await.is_err() {
                    break;
                }
            }
            (level, children)
        }
        Err(e) => {
            warn!("Walk error {}: {}", dir.display(), e);
            (level, Vec::new())
        }
    }
}

/// Immediate subdirectories of `dir`, minus ignored names and symlinks.
async fn read_subdirs(dir: &Path, ignore: &HashSet<String>) -> io::Result<Vec<PathBuf>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut dirs = Vec::new();

    loop {
        let entry = match reader.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                warn!("Walk error {}: {}", dir.display(), e);
                break;
            }
        };

        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Walk error {}: {}", entry.path().display(), e);
                continue;
            }
        };
        if !file_type.is_dir() {
            continue;
        }

        if ignore.contains(entry.file_name().to_string_lossy().as_ref()) {
            debug!("Pruned {}", entry.path().display());
            continue;
        }

        dirs.push(entry.path());
    }

    Ok(dirs)
}
