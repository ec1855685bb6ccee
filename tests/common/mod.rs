#![allow(dead_code)]

pub use pollwatch_test_utils::builders;
pub use pollwatch_test_utils::fakes;
pub use pollwatch_test_utils::{init_tracing, with_timeout};

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use pollwatch::fs::mock::{MockFileSystem, default_mtime};
use pollwatch::watch::{FileRecord, Snapshot};

/// Root used by every mock-filesystem test.
pub const MOCK_ROOT: &str = "/watch";

pub fn mock_root() -> PathBuf {
    PathBuf::from(MOCK_ROOT)
}

/// A mock filesystem with just the watch root.
pub fn mock_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir(MOCK_ROOT);
    fs
}

/// A regular-file record under the mock root.
pub fn file_record(rel: &str, size: u64, mtime_offset_secs: u64) -> FileRecord {
    FileRecord {
        path: mock_root().join(rel),
        size,
        modified: default_mtime() + Duration::from_secs(mtime_offset_secs),
        mode: 0o100_644,
        is_dir: false,
    }
}

pub fn snapshot_of(records: &[FileRecord]) -> Snapshot {
    records.iter().cloned().collect()
}

/// Evaluation time one hour after the mock default mtime.
pub fn an_hour_later() -> SystemTime {
    default_mtime() + Duration::from_secs(3600)
}

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Create `dest` atomically by writing into `staging` and renaming, so a
/// concurrent scan never sees a half-written file.
pub fn drop_file(staging: &Path, dest: &Path, contents: &[u8]) {
    let name = dest.file_name().unwrap();
    let staged = staging.join(name);
    std::fs::write(&staged, contents).unwrap();
    std::fs::rename(&staged, dest).unwrap();
}
