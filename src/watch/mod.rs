// src/watch/mod.rs

//! Change detection by polling.
//!
//! This module is responsible for:
//! - Building point-in-time snapshots of a directory tree (`snapshot`).
//! - Diffing two snapshots into typed change events, including move
//!   detection via metadata signatures (`diff`).
//!
//! It does **not** know about actions; it only turns filesystem state into
//! `ChangeEvent`s.

pub mod diff;
pub mod path_utils;
pub mod snapshot;

pub use diff::{ChangeEvent, diff, diff_at};
pub use snapshot::{FileRecord, Signature, Snapshot, build_snapshot};
