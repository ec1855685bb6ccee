// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Snapshot paths are always built by joining onto the root, so a plain
/// `strip_prefix` is enough. Paths outside `root` are returned unchanged.
pub fn relative_str(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// True if any component of a `/`-separated relative path starts with `.`.
pub fn is_hidden(rel_path: &str) -> bool {
    rel_path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .any(|part| part.starts_with('.'))
}
