//! Process-wide cache of built documentation models.
//!
//! Entries are keyed by the modification times of every backing file, so
//! touching the XML file or any client script produces a new key and a
//! rebuild. Each key is built at most once at a time: concurrent callers
//! share one `OnceCell` and block until the first build finishes.

use crate::error::Result;
use crate::model::Documentation;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// A file path together with its last-modified time at stamping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub path: PathBuf,
    /// `None` when the file is missing or has no readable mtime.
    pub modified: Option<SystemTime>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Self {
        FileStamp {
            path: path.to_path_buf(),
            modified: path.metadata().and_then(|m| m.modified()).ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    stamps: Vec<FileStamp>,
}

impl CacheKey {
    pub fn new<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        CacheKey {
            stamps: paths.into_iter().map(FileStamp::of).collect(),
        }
    }

    fn same_files(&self, other: &CacheKey) -> bool {
        self.stamps.len() == other.stamps.len()
            && self
                .stamps
                .iter()
                .zip(&other.stamps)
                .all(|(a, b)| a.path == b.path)
    }
}

type Slot = Arc<OnceCell<Arc<Documentation>>>;

#[derive(Debug, Default)]
pub struct DocumentationCache {
    entries: DashMap<CacheKey, Slot>,
    builds: AtomicUsize,
}

impl DocumentationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the model for `key`, running `build` if nobody has yet.
    ///
    /// A failed build is not cached; the next caller retries.
    pub fn get_or_build<F>(&self, key: CacheKey, build: F) -> Result<Arc<Documentation>>
    where
        F: FnOnce() -> Result<Documentation>,
    {
        // Clone the slot out so no shard lock is held while building.
        let slot: Slot = self.entries.entry(key.clone()).or_default().clone();

        if let Some(doc) = slot.get() {
            debug!("documentation cache hit");
            return Ok(doc.clone());
        }

        let doc = slot
            .get_or_try_init(|| {
                self.builds.fetch_add(1, Ordering::SeqCst);
                let doc = build()?;
                info!(types = doc.len(), "built documentation model");
                Ok::<_, crate::error::Error>(Arc::new(doc))
            })?
            .clone();

        self.evict_stale(&key);
        Ok(doc)
    }

    /// Drop entries for the same files with older stamps.
    fn evict_stale(&self, current: &CacheKey) {
        self.entries
            .retain(|key, _| key == current || !key.same_files(current));
    }

    /// Number of builds started so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
