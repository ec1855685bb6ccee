// src/exec/runner.rs

//! Pluggable per-type action runners.
//!
//! The executor never inspects an action's fields itself; it looks up the
//! runner registered for the action's [`ActionType`] and hands it the event.
//! Tests can register their own runners (e.g. one that fails a scripted
//! number of times) without touching the filesystem or spawning processes.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::ActionSpec;
use crate::errors::ActionError;
use crate::exec::command::ExecRunner;
use crate::exec::transfer::TransferRunner;
use crate::exec::webhook::{HttpTransport, ReqwestTransport, WebhookRunner};
use crate::types::ActionType;
use crate::watch::ChangeEvent;

pub type RunnerFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'a>>;

/// Performs one attempt of one action kind.
///
/// Timeouts, retries and dry-run are handled by the executor; a runner just
/// does the work once and reports success or the error it hit.
pub trait ActionRunner: Send + Sync {
    fn run<'a>(&'a self, event: &'a ChangeEvent, action: &'a ActionSpec) -> RunnerFuture<'a>;
}

/// Maps each action type to the runner that handles it.
#[derive(Clone, Default)]
pub struct RunnerRegistry {
    runners: HashMap<ActionType, Arc<dyn ActionRunner>>,
}

impl fmt::Debug for RunnerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunnerRegistry")
            .field("types", &self.runners.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RunnerRegistry {
    /// Empty registry; every lookup fails until runners are registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Production runners, with webhooks sent through `reqwest`.
    pub fn with_default_runners() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Production runners, with webhooks sent through `transport`.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        let transfer: Arc<dyn ActionRunner> = Arc::new(TransferRunner);

        let mut registry = Self::new();
        registry.register(ActionType::Exec, Arc::new(ExecRunner));
        registry.register(ActionType::Copy, Arc::clone(&transfer));
        registry.register(ActionType::Move, Arc::clone(&transfer));
        registry.register(ActionType::Rename, transfer);
        registry.register(ActionType::Webhook, Arc::new(WebhookRunner::new(transport)));
        registry
    }

    /// Register (or replace) the runner for `action_type`.
    pub fn register(&mut self, action_type: ActionType, runner: Arc<dyn ActionRunner>) {
        self.runners.insert(action_type, runner);
    }

    pub fn get(&self, action_type: ActionType) -> Option<Arc<dyn ActionRunner>> {
        self.runners.get(&action_type).cloned()
    }
}
