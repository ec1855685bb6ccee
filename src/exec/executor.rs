// src/exec/executor.rs

//! Retry / timeout / dry-run orchestration around action runners.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ActionSpec;
use crate::errors::ActionError;
use crate::exec::runner::{ActionRunner, RunnerRegistry};
use crate::watch::ChangeEvent;

/// Result of dispatching one action for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// Last observed error, if the action ultimately failed.
    pub error: Option<String>,
    /// Attempts consumed (0 in dry-run).
    pub attempts: u32,
    pub dry_run: bool,
}

impl ExecutionOutcome {
    fn dry_run() -> Self {
        Self {
            success: true,
            error: None,
            attempts: 0,
            dry_run: true,
        }
    }

    fn succeeded(attempts: u32) -> Self {
        Self {
            success: true,
            error: None,
            attempts,
            dry_run: false,
        }
    }

    fn failed(attempts: u32, error: &ActionError) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            attempts,
            dry_run: false,
        }
    }
}

/// Dispatches actions through a [`RunnerRegistry`].
///
/// Shared by every worker. The only state is the dry-run flag, fixed at
/// construction, and the cancellation token that aborts in-flight attempts.
#[derive(Debug)]
pub struct Executor {
    registry: RunnerRegistry,
    dry_run: bool,
    cancel: CancellationToken,
}

impl Executor {
    pub fn new(registry: RunnerRegistry, dry_run: bool, cancel: CancellationToken) -> Self {
        Self {
            registry,
            dry_run,
            cancel,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run `action` for `event`.
    ///
    /// - Dry-run: nothing is performed; reports success with zero attempts.
    /// - Otherwise up to `1 + retries` attempts, each bounded by the
    ///   action's timeout, stopping at the first success.
    /// - Cancellation aborts the current attempt and skips the rest.
    pub async fn execute(&self, event: &ChangeEvent, action: &ActionSpec) -> ExecutionOutcome {
        if self.dry_run {
            info!(
                action = %action.name,
                event = %event.kind,
                path = %event.path.display(),
                "dry-run: action not performed"
            );
            return ExecutionOutcome::dry_run();
        }

        let action_type = action.action_type();
        let Some(runner) = self.registry.get(action_type) else {
            return ExecutionOutcome::failed(0, &ActionError::UnsupportedAction(action_type));
        };

        let timeout = action.effective_timeout();
        let max_attempts = action.retries.saturating_add(1);
        let mut last_error = ActionError::Cancelled;

        for attempt in 1..=max_attempts {
            match self.attempt(runner.as_ref(), event, action, timeout).await {
                Ok(()) => {
                    debug!(action = %action.name, attempt, "action succeeded");
                    return ExecutionOutcome::succeeded(attempt);
                }
                Err(ActionError::Cancelled) => {
                    info!(action = %action.name, attempt, "action cancelled");
                    return ExecutionOutcome::failed(attempt, &ActionError::Cancelled);
                }
                Err(err) => {
                    warn!(
                        action = %action.name,
                        attempt,
                        max_attempts,
                        error = %err,
                        "action attempt failed"
                    );
                    last_error = err;
                }
            }
        }

        ExecutionOutcome::failed(max_attempts, &last_error)
    }

    async fn attempt(
        &self,
        runner: &dyn ActionRunner,
        event: &ChangeEvent,
        action: &ActionSpec,
        timeout: Duration,
    ) -> Result<(), ActionError> {
        if self.cancel.is_cancelled() {
            return Err(ActionError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ActionError::Cancelled),
            res = tokio::time::timeout(timeout, runner.run(event, action)) => {
                res.unwrap_or(Err(ActionError::Timeout(timeout)))
            }
        }
    }
}
