// src/engine/mod.rs

//! Polling engine for pollwatch.
//!
//! This module ties together:
//! - per-directory workers that scan, diff and dispatch on an interval
//!   ([`worker`])
//! - per-path debouncing of triggers ([`debounce`])
//! - shared outcome counters ([`status`])
//! - the supervisor that runs one worker per watch and fans out
//!   cancellation ([`supervisor`])

pub mod debounce;
pub mod status;
pub mod supervisor;
pub mod worker;

pub use debounce::DebounceTable;
pub use status::{Counters, StatusTracker};
pub use supervisor::Supervisor;
pub use worker::{CycleReport, Worker, WorkerState};
