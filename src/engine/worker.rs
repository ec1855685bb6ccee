// src/engine/worker.rs

//! One directory's poll loop.
//!
//! Each cycle walks the watched tree, diffs it against the previous
//! snapshot, debounces the resulting events and dispatches the selected
//! actions. Cycles for one directory never overlap: the next tick is only
//! awaited once the current cycle has finished dispatching.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::WatchConfig;
use crate::engine::debounce::DebounceTable;
use crate::engine::status::StatusTracker;
use crate::errors::{PollwatchError, Result};
use crate::exec::Executor;
use crate::filter::Matcher;
use crate::fs::FileSystem;
use crate::watch::{ChangeEvent, Snapshot, build_snapshot, diff};

/// Where a worker is within its current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Scanning,
    Diffing,
    Dispatching,
}

/// What happened during one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// This cycle only recorded the baseline snapshot.
    pub baseline: bool,
    /// The walk failed; the previous snapshot was kept.
    pub scan_failed: bool,
    /// Events that passed the debounce check.
    pub events: usize,
    pub debounced: usize,
    pub actions_ok: usize,
    pub actions_failed: usize,
}

pub struct Worker {
    watch: Arc<WatchConfig>,
    fs: Arc<dyn FileSystem>,
    matcher: Matcher,
    executor: Arc<Executor>,
    status: StatusTracker,
    previous: Option<Snapshot>,
    debounce: DebounceTable,
    state: WorkerState,
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("watch", &self.watch.path)
            .field("state", &self.state)
            .field("has_baseline", &self.previous.is_some())
            .finish_non_exhaustive()
    }
}

impl Worker {
    pub fn new(
        watch: Arc<WatchConfig>,
        fs: Arc<dyn FileSystem>,
        matcher: Matcher,
        executor: Arc<Executor>,
        status: StatusTracker,
    ) -> Self {
        let debounce = DebounceTable::new(watch.debounce);
        Self {
            watch,
            fs,
            matcher,
            executor,
            status,
            previous: None,
            debounce,
            state: WorkerState::Idle,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }

    /// Poll until `cancel` fires.
    ///
    /// The first cycle runs immediately and records the baseline.
    pub async fn run(mut self, cancel: CancellationToken) {
        let watch = Arc::clone(&self.watch);
        info!(
            watch = %watch.path.display(),
            interval_ms = watch.scan_interval.as_millis() as u64,
            recursive = watch.recursive,
            actions = watch.actions.len(),
            "worker started"
        );

        let mut ticker = tokio::time::interval(watch.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if cancel.is_cancelled() {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            self.poll_once().await;
        }

        info!(watch = %watch.path.display(), "worker stopped");
    }

    /// Run one full cycle: scan, diff, debounce, dispatch.
    pub async fn poll_once(&mut self) -> CycleReport {
        let mut report = CycleReport::default();

        self.state = WorkerState::Scanning;
        let current = match self.scan().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    watch = %self.watch.path.display(),
                    error = %err,
                    "scan failed; keeping previous snapshot"
                );
                self.state = WorkerState::Idle;
                report.scan_failed = true;
                return report;
            }
        };

        let Some(previous) = self.previous.take() else {
            debug!(
                watch = %self.watch.path.display(),
                entries = current.len(),
                "baseline snapshot recorded"
            );
            self.previous = Some(current);
            self.state = WorkerState::Idle;
            report.baseline = true;
            return report;
        };

        self.state = WorkerState::Diffing;
        let events = diff(&self.watch.path, &previous, &current);
        self.previous = Some(current);

        if !events.is_empty() {
            debug!(
                watch = %self.watch.path.display(),
                count = events.len(),
                "changes detected"
            );
        }

        self.state = WorkerState::Dispatching;
        for event in &events {
            self.handle_event(event, &mut report).await;
        }

        self.state = WorkerState::Idle;
        report
    }

    async fn scan(&self) -> Result<Snapshot> {
        let fs = Arc::clone(&self.fs);
        let root = self.watch.path.clone();
        let recursive = self.watch.recursive;

        let joined =
            tokio::task::spawn_blocking(move || build_snapshot(fs.as_ref(), &root, recursive))
                .await
                .map_err(|e| PollwatchError::Other(anyhow::anyhow!("scan task failed: {e}")))?;

        joined.map_err(|source| PollwatchError::Scan {
            path: self.watch.path.clone(),
            source,
        })
    }

    async fn handle_event(&mut self, event: &ChangeEvent, report: &mut CycleReport) {
        if !self.debounce.accept(event, Instant::now()) {
            trace!(path = %event.path.display(), event = %event.kind, "debounced");
            report.debounced += 1;
            return;
        }

        report.events += 1;
        self.status.record_event(&self.watch.status_key());

        let selected = self.matcher.select(event, &self.watch);
        if selected.is_empty() {
            trace!(path = %event.path.display(), event = %event.kind, "no matching actions");
            return;
        }

        for action in selected {
            let outcome = self.executor.execute(event, action).await;
            self.status
                .record_action(&self.watch.action_status_key(action), &outcome);

            if outcome.success {
                report.actions_ok += 1;
                info!(
                    watch = %self.watch.path.display(),
                    action = %action.name,
                    event = %event.kind,
                    path = %event.path.display(),
                    attempts = outcome.attempts,
                    dry_run = outcome.dry_run,
                    "action completed"
                );
            } else {
                report.actions_failed += 1;
                warn!(
                    watch = %self.watch.path.display(),
                    action = %action.name,
                    event = %event.kind,
                    path = %event.path.display(),
                    attempts = outcome.attempts,
                    error = outcome.error.as_deref().unwrap_or("unknown"),
                    "action failed"
                );
            }
        }
    }
}
