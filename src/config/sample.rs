// src/config/sample.rs

//! Sample configuration written by `pollwatch init`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::errors::{PollwatchError, Result};

pub const SAMPLE_CONFIG: &str = r#"# pollwatch configuration

[global]
scan_interval_ms = 1000
debounce_ms = 200
dry_run = false

[global.defaults]
overwrite = false

[[watch]]
path = "./incoming"
recursive = true
scan_interval_ms = 500
stop_on_first_match = false

[[watch.action]]
name = "images"
type = "exec"
include = ["**/*.jpg", "**/*.png"]
events = ["create", "modify"]
cmd = "python process_image.py {path}"
retries = 3
timeout_ms = 10000

[[watch.action]]
name = "pdf_backup"
type = "copy"
include = ["**/*.pdf"]
exclude = ["**/tmp/**"]
events = ["create"]
dest = "/backup/docs/{relpath}"
overwrite = true

[[watch.action]]
name = "archive_old"
type = "move"
include = ["**/*"]
events = ["modify"]
dest = "{dir}/archive/{name}"

[watch.action.condition]
min_age_ms = "24h"
only_files = true

[[watch.action]]
name = "notify"
type = "webhook"
events = ["create", "delete", "move"]
url = "http://localhost:8080/hooks/files"
"#;

/// Write [`SAMPLE_CONFIG`] to `path`.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_sample_config(path: &Path, force: bool) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true);
    if force {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }

    let mut file = options.open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::AlreadyExists {
            PollwatchError::ConfigError(format!("{} already exists", path.display()))
        } else {
            PollwatchError::IoError(e)
        }
    })?;
    file.write_all(SAMPLE_CONFIG.as_bytes())?;
    Ok(())
}
