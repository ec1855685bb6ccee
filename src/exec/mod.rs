// src/exec/mod.rs

//! Action execution layer.
//!
//! - [`executor`] wraps every dispatch with dry-run, per-attempt timeout,
//!   retries and cancellation, and reports an [`ExecutionOutcome`].
//! - [`runner`] defines the `ActionRunner` trait and the registry mapping
//!   each action type to its runner.
//! - [`command`], [`transfer`] and [`webhook`] are the production runners
//!   for `exec`, `copy`/`move`/`rename` and `webhook` actions.
//! - [`template`] expands `{token}`s from the triggering event.

pub mod command;
pub mod executor;
pub mod runner;
pub mod template;
pub mod transfer;
pub mod webhook;

pub use executor::{ExecutionOutcome, Executor};
pub use runner::{ActionRunner, RunnerFuture, RunnerRegistry};
pub use webhook::{HttpTransport, ReqwestTransport, TransportFuture, WebhookPayload};
