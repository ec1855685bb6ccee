use super::{EntryMetadata, FileSystem};
use anyhow::{Result, anyhow};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Modification time given to entries that don't specify one.
pub const DEFAULT_MTIME_SECS: u64 = 1_700_000_000;

const FILE_MODE: u32 = 0o100_644;
const DIR_MODE: u32 = 0o040_755;

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(EntryMetadata),
    Dir(EntryMetadata, BTreeSet<String>), // child names
}

impl MockEntry {
    fn metadata(&self) -> EntryMetadata {
        match self {
            MockEntry::File(meta) | MockEntry::Dir(meta, _) => *meta,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    entries: HashMap<PathBuf, MockEntry>,
    failing: HashSet<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Paths are used as given (no canonicalisation); tests normally use an
/// absolute root such as `/watch`.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

pub fn default_mtime() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(DEFAULT_MTIME_SECS)
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        ensure_dir(&mut state.entries, path.as_ref());
    }

    /// Add a regular file of `size` bytes with the default mtime.
    pub fn add_file(&self, path: impl AsRef<Path>, size: u64) {
        self.add_file_with(path, size, default_mtime(), FILE_MODE);
    }

    pub fn add_file_with(
        &self,
        path: impl AsRef<Path>,
        size: u64,
        modified: SystemTime,
        mode: u32,
    ) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock().unwrap();
        let meta = EntryMetadata {
            size,
            modified,
            mode,
            is_dir: false,
        };
        state.entries.insert(path.clone(), MockEntry::File(meta));
        link_into_parent(&mut state.entries, &path);
    }

    /// Remove an entry (and, for directories, everything below it).
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state.entries.retain(|p, _| !p.starts_with(path));
        unlink_from_parent(&mut state.entries, path);
    }

    /// Rename a single file, keeping its metadata untouched.
    pub fn rename(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) {
        let (from, to) = (from.as_ref(), to.as_ref().to_path_buf());
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.entries.remove(from) {
            unlink_from_parent(&mut state.entries, from);
            state.entries.insert(to.clone(), entry);
            link_into_parent(&mut state.entries, &to);
        }
    }

    /// Make every subsequent `read_dir`/`metadata` call on `path` fail.
    pub fn fail_reads(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.failing.insert(path.as_ref().to_path_buf());
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().failing.clear();
    }
}

fn ensure_dir(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    let meta = EntryMetadata {
        size: 4096,
        modified: default_mtime(),
        mode: DIR_MODE,
        is_dir: true,
    };
    entries.insert(path.to_path_buf(), MockEntry::Dir(meta, BTreeSet::new()));
    link_into_parent(entries, path);
}

fn link_into_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return;
    };
    if parent.as_os_str().is_empty() {
        return;
    }
    ensure_dir(entries, parent);
    if let Some(MockEntry::Dir(_, children)) = entries.get_mut(parent) {
        children.insert(name.to_string_lossy().into_owned());
    }
}

fn unlink_from_parent(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return;
    };
    if let Some(MockEntry::Dir(_, children)) = entries.get_mut(parent) {
        children.remove(&*name.to_string_lossy());
    }
}

impl FileSystem for MockFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        if state.failing.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        match state.entries.get(path) {
            Some(MockEntry::Dir(_, children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let state = self.state.lock().unwrap();
        if state.failing.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        state
            .entries
            .get(path)
            .map(MockEntry::metadata)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))
    }
}
