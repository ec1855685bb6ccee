// src/engine/supervisor.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::engine::status::{Counters, StatusTracker};
use crate::engine::worker::Worker;
use crate::errors::{PollwatchError, Result};
use crate::exec::{Executor, RunnerRegistry};
use crate::filter::Matcher;
use crate::fs::{FileSystem, RealFileSystem};

/// Owns one worker per watched directory.
///
/// The matcher, executor and status tracker are built once and shared by
/// every worker. Cancelling the token passed to [`Supervisor::new`] stops
/// all workers and aborts in-flight actions.
pub struct Supervisor {
    config: Arc<Config>,
    fs: Arc<dyn FileSystem>,
    matcher: Matcher,
    executor: Arc<Executor>,
    status: StatusTracker,
    cancel: CancellationToken,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("watches", &self.config.watches.len())
            .field("dry_run", &self.executor.is_dry_run())
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    /// Production supervisor: real filesystem and default runners.
    pub fn new(config: Config, cancel: CancellationToken) -> Self {
        Self::with_parts(
            config,
            Arc::new(RealFileSystem),
            RunnerRegistry::with_default_runners(),
            cancel,
        )
    }

    pub fn with_parts(
        config: Config,
        fs: Arc<dyn FileSystem>,
        registry: RunnerRegistry,
        cancel: CancellationToken,
    ) -> Self {
        let executor = Executor::new(registry, config.global.dry_run, cancel.child_token());
        Self {
            config: Arc::new(config),
            fs,
            matcher: Matcher::new(),
            executor: Arc::new(executor),
            status: StatusTracker::new(),
            cancel,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.executor.is_dry_run()
    }

    /// Current counters, keyed by `<dir>` and `<dir>.<action>`.
    pub fn status(&self) -> BTreeMap<String, Counters> {
        self.status.snapshot()
    }

    /// Handle for reading counters from another task.
    pub fn status_tracker(&self) -> StatusTracker {
        self.status.clone()
    }

    /// Start every worker and wait until all of them have stopped.
    ///
    /// Startup problems are returned before any worker is spawned. After
    /// that, a worker that panics is logged and the rest keep running.
    pub async fn run(&self) -> Result<()> {
        for watch in &self.config.watches {
            if watch.scan_interval.is_zero() {
                return Err(PollwatchError::ConfigError(format!(
                    "watch '{}' has a zero scan interval",
                    watch.path.display()
                )));
            }
        }

        info!(
            watches = self.config.watches.len(),
            dry_run = self.executor.is_dry_run(),
            "supervisor starting"
        );

        let mut workers = JoinSet::new();
        for watch in &self.config.watches {
            let worker = Worker::new(
                Arc::new(watch.clone()),
                Arc::clone(&self.fs),
                self.matcher,
                Arc::clone(&self.executor),
                self.status.clone(),
            );
            workers.spawn(worker.run(self.cancel.clone()));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                error!(error = %err, "worker task ended abnormally");
            }
        }

        info!("supervisor stopped");
        Ok(())
    }
}
