// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

pub mod mock;

/// Metadata for a single directory entry, as seen by the snapshot builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub size: u64,
    pub modified: SystemTime,
    /// Unix `st_mode` (type + permission bits). Synthetic on other platforms.
    pub mode: u32,
    pub is_dir: bool,
}

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// Metadata of `path` itself; symlinks are not followed.
    fn metadata(&self, path: &Path) -> Result<EntryMetadata>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry.with_context(|| format!("reading entry in {:?}", path))?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn metadata(&self, path: &Path) -> Result<EntryMetadata> {
        let meta = fs::symlink_metadata(path)
            .with_context(|| format!("reading metadata of {:?}", path))?;

        Ok(EntryMetadata {
            size: meta.len(),
            // Some platforms cannot report mtime; treat it as the epoch.
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            mode: mode_bits(&meta),
            is_dir: meta.is_dir(),
        })
    }
}

#[cfg(unix)]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &fs::Metadata) -> u32 {
    let mut mode = if meta.permissions().readonly() { 0o444 } else { 0o644 };
    if meta.is_dir() {
        mode |= 0o040_111;
    }
    mode
}
