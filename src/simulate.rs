// src/simulate.rs

//! `pollwatch simulate`: run one synthetic event through the matcher and
//! executor without watching anything.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio_util::sync::CancellationToken;

use crate::config::{Config, WatchConfig};
use crate::errors::{PollwatchError, Result};
use crate::exec::{ExecutionOutcome, Executor, RunnerRegistry};
use crate::filter::Matcher;
use crate::types::EventKind;
use crate::watch::{ChangeEvent, FileRecord};

/// Mode bits given to simulated entries (regular file, 0644).
const SIMULATED_MODE: u32 = 0o100_644;

/// Description of the event to fabricate.
#[derive(Debug, Clone)]
pub struct SimulatedEvent {
    pub file: PathBuf,
    pub kind: EventKind,
    pub size: u64,
    pub age: Duration,
}

/// One selected action and what happened when it was dispatched.
#[derive(Debug, Clone)]
pub struct SimulatedAction {
    pub name: String,
    pub outcome: ExecutionOutcome,
}

/// The watch whose path equals `path`, or the first watch if `path` is `None`.
pub fn pick_watch<'c>(config: &'c Config, path: Option<&Path>) -> Option<&'c WatchConfig> {
    match path {
        None => config.watches.first(),
        Some(path) => {
            let wanted = std::path::absolute(path).ok()?;
            config.watches.iter().find(|w| w.path == wanted)
        }
    }
}

/// Build the event a worker would have produced for `spec` at `now`.
pub fn synthetic_event(
    watch: &WatchConfig,
    spec: &SimulatedEvent,
    now: SystemTime,
) -> Result<ChangeEvent> {
    let path = std::path::absolute(&spec.file)?;
    let modified = now.checked_sub(spec.age).unwrap_or(SystemTime::UNIX_EPOCH);
    let record = FileRecord {
        path,
        size: spec.size,
        modified,
        mode: SIMULATED_MODE,
        is_dir: false,
    };
    Ok(ChangeEvent::new(&watch.path, spec.kind, record, now))
}

/// Match the synthetic event against `watch` and dispatch the selected
/// actions in order. Dry-run unless `execute` is set.
pub async fn simulate(
    watch: &WatchConfig,
    spec: &SimulatedEvent,
    registry: RunnerRegistry,
    execute: bool,
) -> Result<Vec<SimulatedAction>> {
    let event = synthetic_event(watch, spec, SystemTime::now())?;
    let executor = Executor::new(registry, !execute, CancellationToken::new());

    let mut results = Vec::new();
    for action in Matcher::new().select(&event, watch) {
        let outcome = executor.execute(&event, action).await;
        results.push(SimulatedAction {
            name: action.name.clone(),
            outcome,
        });
    }
    Ok(results)
}

/// Error for a `--watch` that names no configured directory.
pub fn unknown_watch(path: Option<&Path>) -> PollwatchError {
    match path {
        Some(p) => PollwatchError::ConfigError(format!("watch not found: {}", p.display())),
        None => PollwatchError::ConfigError("no watches configured".to_string()),
    }
}
