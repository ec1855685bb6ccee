// src/config/settings.rs

//! Resolved, immutable configuration consumed by the watch engine.
//!
//! Produced once from a [`RawConfigFile`](crate::config::RawConfigFile) by
//! validation: defaults are applied, paths are absolute and glob patterns
//! are compiled. Nothing downstream re-reads or mutates it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::filter::patterns::PatternSet;
use crate::types::{ActionType, EventKind};

pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);
pub const DEFAULT_ACTION_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Config {
    pub global: GlobalSettings,
    pub watches: Vec<WatchConfig>,
}

#[derive(Debug, Clone)]
pub struct GlobalSettings {
    pub scan_interval: Duration,
    pub debounce: Duration,
    pub dry_run: bool,
    pub default_overwrite: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            scan_interval: DEFAULT_SCAN_INTERVAL,
            debounce: DEFAULT_DEBOUNCE,
            dry_run: false,
            default_overwrite: false,
        }
    }
}

/// One polled directory with its interval/debounce already inherited.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub path: PathBuf,
    pub recursive: bool,
    pub scan_interval: Duration,
    pub debounce: Duration,
    pub stop_on_first_match: bool,
    pub actions: Vec<ActionSpec>,
}

impl WatchConfig {
    /// Key under which this directory's counters are tracked.
    pub fn status_key(&self) -> String {
        self.path.display().to_string()
    }

    /// Key under which an action's counters are tracked: `<dir>.<action>`.
    pub fn action_status_key(&self, action: &ActionSpec) -> String {
        format!("{}.{}", self.path.display(), action.name)
    }
}

/// A named action bound to a watch.
#[derive(Debug, Clone)]
pub struct ActionSpec {
    pub name: String,
    pub kind: ActionKind,
    pub filter: ActionFilter,
    /// Additional attempts after the first failure.
    pub retries: u32,
    pub timeout: Duration,
}

impl ActionSpec {
    pub fn action_type(&self) -> ActionType {
        self.kind.action_type()
    }

    /// Per-attempt timeout, falling back to the default when unset.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_ACTION_TIMEOUT
        } else {
            self.timeout
        }
    }
}

/// What an action does. Each variant carries only its own fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Exec(ExecSpec),
    Copy(TransferSpec),
    Move(TransferSpec),
    Rename(TransferSpec),
    Webhook(WebhookSpec),
}

impl ActionKind {
    pub fn action_type(&self) -> ActionType {
        match self {
            ActionKind::Exec(_) => ActionType::Exec,
            ActionKind::Copy(_) => ActionType::Copy,
            ActionKind::Move(_) => ActionType::Move,
            ActionKind::Rename(_) => ActionType::Rename,
            ActionKind::Webhook(_) => ActionType::Webhook,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecSpec {
    /// Command template, split on whitespace after expansion.
    pub cmd: String,
    pub cwd: Option<String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSpec {
    /// Destination template.
    pub dest: String,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSpec {
    /// URL template.
    pub url: String,
}

/// Restricts an action to files, directories, or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryFilter {
    #[default]
    Any,
    FilesOnly,
    DirsOnly,
}

/// Everything the matcher checks before selecting an action.
#[derive(Debug, Clone)]
pub struct ActionFilter {
    pub events: BTreeSet<EventKind>,
    /// Empty means "match everything".
    pub include: PatternSet,
    pub exclude: PatternSet,
    pub min_size: Option<u64>,
    pub max_size: Option<u64>,
    pub min_age: Option<Duration>,
    pub max_age: Option<Duration>,
    pub entries: EntryFilter,
    pub ignore_hidden: bool,
}

impl Default for ActionFilter {
    fn default() -> Self {
        Self {
            events: [EventKind::Create, EventKind::Modify].into_iter().collect(),
            include: PatternSet::empty(),
            exclude: PatternSet::empty(),
            min_size: None,
            max_size: None,
            min_age: None,
            max_age: None,
            entries: EntryFilter::Any,
            ignore_hidden: true,
        }
    }
}
