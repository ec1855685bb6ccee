// src/config/mod.rs

//! Configuration loading and validation for pollwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, expanding env references (`loader.rs`).
//! - Validate and resolve it into an immutable [`Config`] (`validate.rs`,
//!   `settings.rs`).
//! - Provide the sample written by `pollwatch init` (`sample.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod sample;
pub mod settings;
pub mod validate;

pub use duration::{MillisDuration, parse_duration};
pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{
    ActionSection, ConditionSection, DefaultsSection, GlobalSection, RawConfigFile, WatchSection,
};
pub use settings::{
    ActionFilter, ActionKind, ActionSpec, Config, EntryFilter, ExecSpec, GlobalSettings,
    TransferSpec, WatchConfig, WebhookSpec,
};
pub use validate::validate_config;
