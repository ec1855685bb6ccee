// tests/executor.rs

mod common;
use crate::common::builders::{ActionSpecBuilder, EventBuilder};
use crate::common::fakes::ScriptedRunner;
use crate::common::{init_tracing, mock_root, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use pollwatch::exec::{Executor, RunnerRegistry};
use pollwatch::types::ActionType;

fn executor_with(runner: &ScriptedRunner, dry_run: bool) -> (Executor, CancellationToken) {
    let mut registry = RunnerRegistry::new();
    registry.register(ActionType::Exec, Arc::new(runner.clone()));
    let cancel = CancellationToken::new();
    (Executor::new(registry, dry_run, cancel.clone()), cancel)
}

#[tokio::test]
async fn dry_run_performs_nothing() {
    init_tracing();
    let runner = ScriptedRunner::succeeding();
    let (executor, _cancel) = executor_with(&runner, true);

    let event = EventBuilder::create(mock_root(), "x.jpg").size(10).build();
    let action = ActionSpecBuilder::exec("images", "echo {path}").build();

    let outcome = executor.execute(&event, &action).await;

    assert!(outcome.success);
    assert!(outcome.dry_run);
    assert_eq!(outcome.attempts, 0);
    assert_eq!(runner.attempts(), 0);
}

#[tokio::test]
async fn success_on_first_attempt() {
    let runner = ScriptedRunner::succeeding();
    let (executor, _cancel) = executor_with(&runner, false);

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("a", "true").retries(3).build();

    let outcome = executor.execute(&event, &action).await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.error, None);
    assert_eq!(runner.calls().len(), 1);
    assert_eq!(runner.calls()[0].action, "a");
}

#[tokio::test]
async fn retries_until_success() {
    init_tracing();
    let runner = ScriptedRunner::failing_times(2);
    let (executor, _cancel) = executor_with(&runner, false);

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("flaky", "true").retries(3).build();

    let outcome = executor.execute(&event, &action).await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(runner.attempts(), 3);
}

#[tokio::test]
async fn exhausted_retries_report_last_error() {
    let runner = ScriptedRunner::always_failing();
    let (executor, _cancel) = executor_with(&runner, false);

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("broken", "false").retries(2).build();

    let outcome = executor.execute(&event, &action).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(runner.attempts(), 3);
    let err = outcome.error.unwrap();
    assert!(err.contains("scripted failure 3"), "got: {err}");
}

#[tokio::test]
async fn slow_attempts_time_out_and_are_retried() {
    let runner = ScriptedRunner::succeeding().with_delay(Duration::from_secs(10));
    let (executor, _cancel) = executor_with(&runner, false);

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("slow", "sleep 10")
        .timeout(Duration::from_millis(100))
        .retries(1)
        .build();

    let outcome = executor.execute(&event, &action).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 2);
    assert!(outcome.error.unwrap().contains("timed out"));
}

#[tokio::test]
async fn cancellation_aborts_in_flight_attempt() {
    let runner = ScriptedRunner::succeeding().with_delay(Duration::from_secs(60));
    let (executor, cancel) = executor_with(&runner, false);

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("long", "sleep 60")
        .timeout(Duration::from_secs(120))
        .retries(5)
        .build();

    let canceller = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel.cancel();
        })
    };

    let outcome = with_timeout(executor.execute(&event, &action)).await;
    canceller.await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.error.as_deref(), Some("cancelled"));
    assert_eq!(runner.attempts(), 1);
}

#[tokio::test]
async fn already_cancelled_token_skips_work() {
    let runner = ScriptedRunner::succeeding();
    let (executor, cancel) = executor_with(&runner, false);
    cancel.cancel();

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::exec("a", "true").build();

    let outcome = executor.execute(&event, &action).await;

    assert!(!outcome.success);
    assert_eq!(runner.attempts(), 0);
}

#[tokio::test]
async fn missing_runner_is_a_failure() {
    let executor = Executor::new(RunnerRegistry::new(), false, CancellationToken::new());

    let event = EventBuilder::create(mock_root(), "a").build();
    let action = ActionSpecBuilder::webhook("hook", "http://localhost/").build();

    let outcome = executor.execute(&event, &action).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts, 0);
    assert!(outcome.error.unwrap().contains("webhook"));
}
