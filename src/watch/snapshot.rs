// src/watch/snapshot.rs

//! Point-in-time snapshots of a watched directory tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing::trace;

use crate::fs::{EntryMetadata, FileSystem};

/// One tracked filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
    pub mode: u32,
    pub is_dir: bool,
}

impl FileRecord {
    pub fn from_metadata(path: PathBuf, meta: EntryMetadata) -> Self {
        Self {
            path,
            size: meta.size,
            modified: meta.modified,
            mode: meta.mode,
            is_dir: meta.is_dir,
        }
    }

    /// Cheap identity used to pair a vanished path with a new one.
    pub fn signature(&self) -> Signature {
        Signature {
            size: self.size,
            modified_nanos: nanos_since_epoch(self.modified),
            mode: self.mode,
        }
    }

    /// True if size, mtime or mode differ.
    pub fn differs_from(&self, other: &FileRecord) -> bool {
        self.size != other.size || self.modified != other.modified || self.mode != other.mode
    }
}

/// `(size, mtime in ns, mode)` tuple; see [`FileRecord::signature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature {
    pub size: u64,
    pub modified_nanos: i128,
    pub mode: u32,
}

fn nanos_since_epoch(t: SystemTime) -> i128 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_nanos() as i128,
        Err(before) => -(before.duration().as_nanos() as i128),
    }
}

/// State of one root at one poll instant, keyed by absolute path.
///
/// Iteration is in path order, which keeps diffing deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<PathBuf, FileRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: FileRecord) {
        self.entries.insert(record.path.clone(), record);
    }

    pub fn get(&self, path: &Path) -> Option<&FileRecord> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values()
    }
}

impl FromIterator<FileRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = FileRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// Walk `root` and record every entry below it.
///
/// - The root itself is not recorded.
/// - With `recursive = false` only direct children are recorded.
/// - Symlinks are recorded as-is and never followed.
/// - Any read error aborts the walk; a partial snapshot is never returned.
pub fn build_snapshot(fs: &dyn FileSystem, root: &Path, recursive: bool) -> Result<Snapshot> {
    let mut snapshot = Snapshot::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let meta = fs.metadata(&path)?;
            if meta.is_dir && recursive {
                stack.push(path.clone());
            }
            snapshot.insert(FileRecord::from_metadata(path, meta));
        }
    }

    trace!(root = ?root, entries = snapshot.len(), "snapshot built");
    Ok(snapshot)
}
