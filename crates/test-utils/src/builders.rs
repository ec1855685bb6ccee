#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use pollwatch::config::{
    ActionFilter, ActionKind, ActionSpec, Config, EntryFilter, ExecSpec, GlobalSettings,
    TransferSpec, WatchConfig, WebhookSpec,
};
use pollwatch::filter::PatternSet;
use pollwatch::fs::mock::default_mtime;
use pollwatch::types::EventKind;
use pollwatch::watch::{ChangeEvent, FileRecord};

/// Builder for a resolved `Config`, skipping TOML and validation.
pub struct ConfigBuilder {
    global: GlobalSettings,
    watches: Vec<WatchConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            global: GlobalSettings::default(),
            watches: Vec::new(),
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.global.dry_run = dry_run;
        self
    }

    pub fn with_watch(mut self, watch: WatchConfig) -> Self {
        self.watches.push(watch);
        self
    }

    pub fn build(self) -> Config {
        Config {
            global: self.global,
            watches: self.watches,
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `WatchConfig`. Defaults: recursive, 10 ms interval, no debounce.
pub struct WatchConfigBuilder {
    watch: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            watch: WatchConfig {
                path: path.into(),
                recursive: true,
                scan_interval: Duration::from_millis(10),
                debounce: Duration::ZERO,
                stop_on_first_match: false,
                actions: Vec::new(),
            },
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.watch.recursive = recursive;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.watch.scan_interval = interval;
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.watch.debounce = window;
        self
    }

    pub fn stop_on_first_match(mut self) -> Self {
        self.watch.stop_on_first_match = true;
        self
    }

    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.watch.actions.push(action);
        self
    }

    pub fn build(self) -> WatchConfig {
        self.watch
    }
}

/// Builder for `ActionSpec`. Filters start at the config defaults
/// (create + modify, hidden paths ignored).
pub struct ActionSpecBuilder {
    action: ActionSpec,
}

impl ActionSpecBuilder {
    fn with_kind(name: &str, kind: ActionKind) -> Self {
        Self {
            action: ActionSpec {
                name: name.to_string(),
                kind,
                filter: ActionFilter::default(),
                retries: 0,
                timeout: Duration::from_secs(5),
            },
        }
    }

    pub fn exec(name: &str, cmd: &str) -> Self {
        Self::with_kind(
            name,
            ActionKind::Exec(ExecSpec {
                cmd: cmd.to_string(),
                cwd: None,
                env: Default::default(),
            }),
        )
    }

    pub fn copy(name: &str, dest: &str) -> Self {
        Self::with_kind(name, ActionKind::Copy(transfer(dest)))
    }

    pub fn move_to(name: &str, dest: &str) -> Self {
        Self::with_kind(name, ActionKind::Move(transfer(dest)))
    }

    pub fn rename(name: &str, dest: &str) -> Self {
        Self::with_kind(name, ActionKind::Rename(transfer(dest)))
    }

    pub fn webhook(name: &str, url: &str) -> Self {
        Self::with_kind(
            name,
            ActionKind::Webhook(WebhookSpec {
                url: url.to_string(),
            }),
        )
    }

    pub fn include(mut self, patterns: &[&str]) -> Self {
        self.action.filter.include = compile(patterns);
        self
    }

    pub fn exclude(mut self, patterns: &[&str]) -> Self {
        self.action.filter.exclude = compile(patterns);
        self
    }

    pub fn events(mut self, events: &[EventKind]) -> Self {
        self.action.filter.events = events.iter().copied().collect();
        self
    }

    pub fn min_size(mut self, bytes: u64) -> Self {
        self.action.filter.min_size = Some(bytes);
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.action.filter.max_size = Some(bytes);
        self
    }

    pub fn min_age(mut self, age: Duration) -> Self {
        self.action.filter.min_age = Some(age);
        self
    }

    pub fn max_age(mut self, age: Duration) -> Self {
        self.action.filter.max_age = Some(age);
        self
    }

    pub fn files_only(mut self) -> Self {
        self.action.filter.entries = EntryFilter::FilesOnly;
        self
    }

    pub fn dirs_only(mut self) -> Self {
        self.action.filter.entries = EntryFilter::DirsOnly;
        self
    }

    pub fn ignore_hidden(mut self, ignore: bool) -> Self {
        self.action.filter.ignore_hidden = ignore;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.action.retries = retries;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.action.timeout = timeout;
        self
    }

    /// Only meaningful for copy / move / rename.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        match &mut self.action.kind {
            ActionKind::Copy(t) | ActionKind::Move(t) | ActionKind::Rename(t) => {
                t.overwrite = overwrite;
            }
            _ => panic!("overwrite() on a non-transfer action"),
        }
        self
    }

    pub fn cwd(mut self, cwd: &str) -> Self {
        match &mut self.action.kind {
            ActionKind::Exec(spec) => spec.cwd = Some(cwd.to_string()),
            _ => panic!("cwd() on a non-exec action"),
        }
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        match &mut self.action.kind {
            ActionKind::Exec(spec) => {
                spec.env.insert(key.to_string(), value.to_string());
            }
            _ => panic!("env() on a non-exec action"),
        }
        self
    }

    pub fn build(self) -> ActionSpec {
        self.action
    }
}

fn transfer(dest: &str) -> TransferSpec {
    TransferSpec {
        dest: dest.to_string(),
        overwrite: false,
    }
}

fn compile(patterns: &[&str]) -> PatternSet {
    let owned: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
    PatternSet::new(&owned).expect("test patterns should compile")
}

/// Builder for a `ChangeEvent` under `root`.
///
/// Defaults: a 0644 regular file of size 0, mtime = mock default, evaluated
/// one hour after that mtime.
pub struct EventBuilder {
    root: PathBuf,
    rel: String,
    kind: EventKind,
    size: u64,
    modified: SystemTime,
    now: SystemTime,
    is_dir: bool,
    prev_rel: Option<String>,
}

impl EventBuilder {
    pub fn new(root: impl AsRef<Path>, rel: &str, kind: EventKind) -> Self {
        let modified = default_mtime();
        Self {
            root: root.as_ref().to_path_buf(),
            rel: rel.to_string(),
            kind,
            size: 0,
            modified,
            now: modified + Duration::from_secs(3600),
            is_dir: false,
            prev_rel: None,
        }
    }

    pub fn create(root: impl AsRef<Path>, rel: &str) -> Self {
        Self::new(root, rel, EventKind::Create)
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn modified(mut self, modified: SystemTime) -> Self {
        self.modified = modified;
        self
    }

    /// Set the event's age relative to its mtime.
    pub fn age(mut self, age: Duration) -> Self {
        self.now = self.modified + age;
        self
    }

    pub fn dir(mut self) -> Self {
        self.is_dir = true;
        self
    }

    pub fn moved_from(mut self, prev_rel: &str) -> Self {
        self.kind = EventKind::Move;
        self.prev_rel = Some(prev_rel.to_string());
        self
    }

    pub fn build(self) -> ChangeEvent {
        let record = FileRecord {
            path: self.root.join(&self.rel),
            size: self.size,
            modified: self.modified,
            mode: if self.is_dir { 0o040_755 } else { 0o100_644 },
            is_dir: self.is_dir,
        };
        let mut event = ChangeEvent::new(&self.root, self.kind, record, self.now);
        event.prev_path = self.prev_rel.map(|p| self.root.join(p));
        event
    }
}
