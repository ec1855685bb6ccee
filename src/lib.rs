// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod filter;
pub mod fs;
pub mod logging;
pub mod simulate;
pub mod types;
pub mod watch;

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command, SimulateArgs};
use crate::config::loader::load_and_validate;
use crate::config::sample::write_sample_config;
use crate::config::parse_duration;
use crate::engine::{Counters, Supervisor};
use crate::exec::RunnerRegistry;
use crate::simulate::{SimulatedEvent, pick_watch, simulate, unknown_watch};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Run { dry_run } => run_watchers(&args.config, dry_run).await,
        Command::Validate => {
            load_and_validate(&args.config)
                .with_context(|| format!("validating {}", args.config.display()))?;
            println!("config OK");
            Ok(())
        }
        Command::Init { ref path, force } => {
            let target = path.as_deref().unwrap_or(&args.config);
            write_sample_config(target, force)?;
            println!("wrote {}", target.display());
            Ok(())
        }
        Command::Simulate(ref sim) => run_simulation(&args.config, sim).await,
    }
}

/// Watch every configured directory until Ctrl-C or SIGTERM.
///
/// - load + validate the config (`--dry-run` overrides `global.dry_run`)
/// - start the supervisor
/// - Ctrl-C or SIGTERM cancels workers and in-flight actions
/// - print the counters once everything has stopped
async fn run_watchers(config_path: &Path, force_dry_run: bool) -> Result<()> {
    let mut config = load_and_validate(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    if force_dry_run {
        config.global.dry_run = true;
    }

    let cancel = CancellationToken::new();
    match shutdown_signal() {
        Ok(signalled) => {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                signalled.await;
                info!("shutdown requested");
                cancel.cancel();
            });
        }
        Err(e) => warn!(error = %e, "failed to listen for shutdown signals"),
    }

    let supervisor = Supervisor::new(config, cancel);
    supervisor.run().await?;

    print_status(&supervisor.status());
    Ok(())
}

/// Register shutdown handlers and return a future that resolves on the
/// first Ctrl-C or, on unix, SIGTERM.
///
/// Handlers are installed before this returns, so a signal delivered
/// right after is not lost.
#[cfg(unix)]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    Ok(async move {
        tokio::select! {
            _ = ctrl_c_or_pending() => {}
            _ = term.recv() => {}
        }
    })
}

#[cfg(not(unix))]
pub fn shutdown_signal() -> std::io::Result<impl Future<Output = ()> + Send> {
    Ok(ctrl_c_or_pending())
}

/// Ctrl-C; never resolves if the handler cannot be installed.
async fn ctrl_c_or_pending() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

async fn run_simulation(config_path: &Path, sim: &SimulateArgs) -> Result<()> {
    let config = load_and_validate(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let watch = pick_watch(&config, sim.watch.as_deref())
        .ok_or_else(|| unknown_watch(sim.watch.as_deref()))?;

    let age = match &sim.age {
        Some(text) => parse_duration(text).map_err(|e| anyhow::anyhow!("--age: {e}"))?,
        None => Default::default(),
    };

    let spec = SimulatedEvent {
        file: sim.file.clone(),
        kind: sim.event,
        size: sim.size,
        age,
    };

    let registry = RunnerRegistry::with_default_runners();
    let results = simulate(watch, &spec, registry, sim.execute).await?;
    if results.is_empty() {
        println!("no actions matched");
        return Ok(());
    }

    for result in results {
        match (&result.outcome.error, result.outcome.dry_run) {
            (Some(err), _) => println!("action {} error: {err}", result.name),
            (None, true) => println!("action {} (dry-run)", result.name),
            (None, false) => println!("action {} executed", result.name),
        }
    }
    Ok(())
}

fn print_status(status: &BTreeMap<String, Counters>) {
    if status.is_empty() {
        println!("no activity recorded");
        return;
    }

    println!("pollwatch status");
    for (key, c) in status {
        println!(
            "  {key}: events={} run={} ok={} failed={}",
            c.events_seen, c.actions_run, c.actions_ok, c.actions_failed
        );
        if let Some(ref err) = c.last_error {
            println!("      last_error: {err}");
        }
    }
}
