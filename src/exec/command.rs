// src/exec/command.rs

//! `exec` actions: run a templated command line.

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::{ActionKind, ActionSpec, ExecSpec};
use crate::errors::ActionError;
use crate::exec::runner::{ActionRunner, RunnerFuture};
use crate::exec::template::expand;
use crate::watch::ChangeEvent;

/// Runs `exec` actions as child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecRunner;

impl ActionRunner for ExecRunner {
    fn run<'a>(&'a self, event: &'a ChangeEvent, action: &'a ActionSpec) -> RunnerFuture<'a> {
        Box::pin(async move {
            match &action.kind {
                ActionKind::Exec(spec) => run_command(event, action, spec).await,
                other => Err(ActionError::UnsupportedAction(other.action_type())),
            }
        })
    }
}

/// Expand and run the command once.
///
/// The expanded line is split on whitespace; quotes are not interpreted.
/// stdout/stderr go straight to ours. The child is killed if this future is
/// dropped (timeout or cancellation).
async fn run_command(
    event: &ChangeEvent,
    action: &ActionSpec,
    spec: &ExecSpec,
) -> Result<(), ActionError> {
    let line = expand(&spec.cmd, event);
    let mut parts = line.split_whitespace();
    let Some(program) = parts.next() else {
        debug!(action = %action.name, "command expanded to nothing; skipping");
        return Ok(());
    };

    let mut cmd = Command::new(program);
    cmd.args(parts)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(expand(cwd, event));
    }
    for (key, value) in &spec.env {
        cmd.env(key, expand(value, event));
    }

    info!(action = %action.name, cmd = %line, "starting action process");

    let mut child = cmd.spawn().map_err(|source| ActionError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let status = child
        .wait()
        .await
        .map_err(|e| ActionError::io(format!("waiting for '{program}'"), e))?;

    debug!(action = %action.name, success = status.success(), "action process exited");

    if status.success() {
        Ok(())
    } else {
        Err(ActionError::NonZeroExit(describe_status(status)))
    }
}

fn describe_status(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}
