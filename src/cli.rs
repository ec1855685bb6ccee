// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::types::EventKind;

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll directories for changes and run actions on matching files.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `pollwatch.toml` in the current working directory.
    #[arg(long, global = true, value_name = "PATH", default_value = "pollwatch.toml")]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start watching every configured directory until Ctrl-C or SIGTERM.
    Run {
        /// Log matched actions instead of performing them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Load and validate the config, then exit.
    Validate,

    /// Write a sample config file.
    Init {
        /// Where to write it. Defaults to `--config`.
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Replace an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Feed a synthetic event through the matcher and executor.
    Simulate(SimulateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Path of the file the event is about.
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// Watch directory to match against. Defaults to the first watch.
    #[arg(long, value_name = "PATH")]
    pub watch: Option<PathBuf>,

    /// create, modify, delete or move.
    #[arg(long, default_value = "create")]
    pub event: EventKind,

    /// File size in bytes.
    #[arg(long, default_value_t = 0)]
    pub size: u64,

    /// File age, e.g. `10s`, `2m`, `1h`.
    #[arg(long, value_name = "DURATION")]
    pub age: Option<String>,

    /// Actually run the selected actions (default is dry-run).
    #[arg(long)]
    pub execute: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
