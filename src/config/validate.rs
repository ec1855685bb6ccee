// src/config/validate.rs

use std::collections::HashSet;
use std::path::Path;

use crate::config::model::{ActionSection, ConditionSection, RawConfigFile, WatchSection};
use crate::config::settings::{
    ActionFilter, ActionKind, ActionSpec, Config, DEFAULT_ACTION_TIMEOUT, DEFAULT_DEBOUNCE,
    DEFAULT_SCAN_INTERVAL, EntryFilter, ExecSpec, GlobalSettings, TransferSpec, WatchConfig,
    WebhookSpec,
};
use crate::errors::{PollwatchError, Result};
use crate::filter::PatternSet;
use crate::types::{ActionType, EventKind};

impl TryFrom<RawConfigFile> for Config {
    type Error = PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        resolve_config(raw)
    }
}

/// Check structural invariants of a raw config without resolving it.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_watches(cfg)?;
    for (idx, watch) in cfg.watches.iter().enumerate() {
        validate_watch(idx, watch)?;
    }
    Ok(())
}

fn ensure_has_watches(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watches.is_empty() {
        return Err(config_error(
            "config must contain at least one [[watch]] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_watch(idx: usize, watch: &WatchSection) -> Result<()> {
    if watch.path.trim().is_empty() {
        return Err(config_error(format!("watch {idx}: path is required")));
    }

    let path = Path::new(&watch.path);
    if !path.is_dir() {
        return Err(config_error(format!(
            "watch {}: path does not exist or is not a directory",
            watch.path
        )));
    }

    if watch.actions.is_empty() {
        return Err(config_error(format!(
            "watch {}: at least one [[watch.action]] is required",
            watch.path
        )));
    }

    let mut names = HashSet::new();
    for (action_idx, action) in watch.actions.iter().enumerate() {
        if action.name.trim().is_empty() {
            return Err(config_error(format!(
                "watch {} action {}: name is required",
                watch.path, action_idx
            )));
        }
        if !names.insert(action.name.as_str()) {
            return Err(config_error(format!(
                "watch {}: duplicate action name '{}'",
                watch.path, action.name
            )));
        }
        validate_action(action).map_err(|msg| {
            config_error(format!("watch {} action '{}': {}", watch.path, action.name, msg))
        })?;
    }

    Ok(())
}

fn validate_action(action: &ActionSection) -> std::result::Result<(), String> {
    let required = match action.action_type {
        ActionType::Exec => ("cmd", &action.cmd),
        ActionType::Copy | ActionType::Move | ActionType::Rename => ("dest", &action.dest),
        ActionType::Webhook => ("url", &action.url),
    };
    if is_blank(required.1) {
        return Err(format!(
            "{} action requires `{}`",
            action.action_type, required.0
        ));
    }

    if action.condition.only_files && action.condition.only_dirs {
        return Err("cannot set both only_files and only_dirs".to_string());
    }

    Ok(())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Apply defaults, absolutise paths and compile patterns.
fn resolve_config(raw: RawConfigFile) -> Result<Config> {
    let global = GlobalSettings {
        scan_interval: or_default(raw.global.scan_interval_ms.as_duration(), DEFAULT_SCAN_INTERVAL),
        debounce: or_default(raw.global.debounce_ms.as_duration(), DEFAULT_DEBOUNCE),
        dry_run: raw.global.dry_run,
        default_overwrite: raw.global.defaults.overwrite,
    };

    let watches = raw
        .watches
        .into_iter()
        .map(|watch| resolve_watch(watch, &global))
        .collect::<Result<Vec<_>>>()?;

    Ok(Config { global, watches })
}

fn resolve_watch(watch: WatchSection, global: &GlobalSettings) -> Result<WatchConfig> {
    let path = std::path::absolute(&watch.path)?;

    let actions = watch
        .actions
        .into_iter()
        .map(|action| {
            let name = action.name.clone();
            resolve_action(action, global).map_err(|e| {
                config_error(format!("watch {} action '{}': {:#}", watch.path, name, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(WatchConfig {
        path,
        recursive: watch.recursive,
        scan_interval: or_default(watch.scan_interval_ms.as_duration(), global.scan_interval),
        debounce: or_default(watch.debounce_ms.as_duration(), global.debounce),
        stop_on_first_match: watch.stop_on_first_match,
        actions,
    })
}

fn resolve_action(action: ActionSection, global: &GlobalSettings) -> anyhow::Result<ActionSpec> {
    let overwrite = action.overwrite.unwrap_or(global.default_overwrite);
    let transfer = || TransferSpec {
        dest: action.dest.clone().unwrap_or_default(),
        overwrite,
    };

    let kind = match action.action_type {
        ActionType::Exec => ActionKind::Exec(ExecSpec {
            cmd: action.cmd.clone().unwrap_or_default(),
            cwd: action.cwd.clone().filter(|c| !c.trim().is_empty()),
            env: action.env.clone(),
        }),
        ActionType::Copy => ActionKind::Copy(transfer()),
        ActionType::Move => ActionKind::Move(transfer()),
        ActionType::Rename => ActionKind::Rename(transfer()),
        ActionType::Webhook => ActionKind::Webhook(WebhookSpec {
            url: action.url.clone().unwrap_or_default(),
        }),
    };

    let events = if action.events.is_empty() {
        [EventKind::Create, EventKind::Modify].into_iter().collect()
    } else {
        action.events.iter().copied().collect()
    };

    let filter = ActionFilter {
        events,
        include: PatternSet::new(&action.include)?,
        exclude: PatternSet::new(&action.exclude)?,
        entries: entry_filter(&action.condition),
        min_size: bound(action.condition.min_size_bytes),
        max_size: bound(action.condition.max_size_bytes),
        min_age: action.condition.min_age_ms.filter(|d| !d.is_zero()).map(|d| d.as_duration()),
        max_age: action.condition.max_age_ms.filter(|d| !d.is_zero()).map(|d| d.as_duration()),
        ignore_hidden: action.condition.ignore_hidden.unwrap_or(true),
    };

    Ok(ActionSpec {
        name: action.name,
        kind,
        filter,
        retries: action.retries,
        timeout: or_default(action.timeout_ms.as_duration(), DEFAULT_ACTION_TIMEOUT),
    })
}

fn entry_filter(condition: &ConditionSection) -> EntryFilter {
    if condition.only_files {
        EntryFilter::FilesOnly
    } else if condition.only_dirs {
        EntryFilter::DirsOnly
    } else {
        EntryFilter::Any
    }
}

/// A size bound of zero is the same as no bound.
fn bound(value: Option<u64>) -> Option<u64> {
    value.filter(|&v| v > 0)
}

fn or_default(value: std::time::Duration, default: std::time::Duration) -> std::time::Duration {
    if value.is_zero() { default } else { value }
}

fn config_error(msg: String) -> PollwatchError {
    PollwatchError::ConfigError(msg)
}
