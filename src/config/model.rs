// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::config::duration::MillisDuration;
use crate::types::{ActionType, EventKind};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [global]
/// scan_interval_ms = 1000
/// debounce_ms = 200
///
/// [[watch]]
/// path = "./incoming"
/// recursive = true
///
/// [[watch.action]]
/// name = "images"
/// type = "exec"
/// include = ["**/*.jpg"]
/// cmd = "echo {path}"
/// ```
///
/// This is the raw, unvalidated shape. Use
/// [`crate::config::load_and_validate`] to get a resolved [`crate::config::Config`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub global: GlobalSection,

    /// All `[[watch]]` entries, in file order.
    #[serde(default, rename = "watch")]
    pub watches: Vec<WatchSection>,
}

/// `[global]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalSection {
    /// Poll interval; 0 means the built-in default (1s).
    #[serde(default)]
    pub scan_interval_ms: MillisDuration,

    /// Per-path debounce window; 0 means the built-in default (200ms).
    #[serde(default)]
    pub debounce_ms: MillisDuration,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// `[global.defaults]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Overwrite policy for copy/move/rename actions that don't set one.
    #[serde(default)]
    pub overwrite: bool,
}

/// `[[watch]]` entry: one polled directory and its actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchSection {
    pub path: String,

    #[serde(default)]
    pub recursive: bool,

    /// 0 inherits `global.scan_interval_ms`.
    #[serde(default)]
    pub scan_interval_ms: MillisDuration,

    /// 0 inherits `global.debounce_ms`.
    #[serde(default)]
    pub debounce_ms: MillisDuration,

    #[serde(default)]
    pub stop_on_first_match: bool,

    /// `[[watch.action]]` entries, in evaluation order.
    #[serde(default, rename = "action")]
    pub actions: Vec<ActionSection>,
}

/// `[[watch.action]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSection {
    pub name: String,

    #[serde(rename = "type")]
    pub action_type: ActionType,

    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// Event kinds this action reacts to; empty means create + modify.
    #[serde(default)]
    pub events: Vec<EventKind>,

    /// Destination template (copy / move / rename).
    #[serde(default)]
    pub dest: Option<String>,

    /// Command template (exec).
    #[serde(default)]
    pub cmd: Option<String>,

    /// URL template (webhook).
    #[serde(default)]
    pub url: Option<String>,

    /// Extra environment for exec; values are templates.
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Working directory for exec.
    #[serde(default)]
    pub cwd: Option<String>,

    /// 0 means the built-in default (30s).
    #[serde(default)]
    pub timeout_ms: MillisDuration,

    /// Additional attempts after the first failure.
    #[serde(default)]
    pub retries: u32,

    /// If `None`, falls back to `global.defaults.overwrite`.
    #[serde(default)]
    pub overwrite: Option<bool>,

    #[serde(default)]
    pub condition: ConditionSection,
}

/// `[watch.action.condition]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionSection {
    #[serde(default)]
    pub min_size_bytes: Option<u64>,

    #[serde(default)]
    pub max_size_bytes: Option<u64>,

    #[serde(default)]
    pub min_age_ms: Option<MillisDuration>,

    #[serde(default)]
    pub max_age_ms: Option<MillisDuration>,

    #[serde(default)]
    pub only_files: bool,

    #[serde(default)]
    pub only_dirs: bool,

    /// Skip paths with a component starting with `.`; defaults to true.
    #[serde(default)]
    pub ignore_hidden: Option<bool>,
}
