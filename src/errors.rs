// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::types::ActionType;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Scan of {path:?} failed: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a single action attempt failed.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("cancelled")]
    Cancelled,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command exited with {0}")]
    NonZeroExit(String),

    #[error("`{0}` expanded to an empty string")]
    EmptyTemplate(&'static str),

    #[error("destination exists: {0:?}")]
    DestinationExists(PathBuf),

    /// Cross-device move copied the file but left the source behind.
    #[error("copied {from:?} to {to:?} but could not remove the source: {cause}")]
    SourceNotRemoved {
        from: PathBuf,
        to: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("webhook request failed: {0}")]
    Http(String),

    #[error("webhook returned status {0}")]
    HttpStatus(u16),

    #[error("no runner registered for action type {0}")]
    UnsupportedAction(ActionType),
}

impl ActionError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ActionError::Io {
            context: context.into(),
            source,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
