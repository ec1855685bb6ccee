// src/engine/status.rs

//! Shared outcome counters, readable while workers are running.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use crate::exec::ExecutionOutcome;

/// Running totals for one directory or one `<directory>.<action>` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counters {
    pub events_seen: u64,
    pub actions_run: u64,
    pub actions_ok: u64,
    pub actions_failed: u64,
    pub last_error: Option<String>,
    pub last_activity: Option<SystemTime>,
}

/// The only state mutated by more than one worker.
///
/// Every update takes the single mutex, so readers always see whole
/// increments. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct StatusTracker {
    counters: Arc<Mutex<HashMap<String, Counters>>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&self, key: &str) {
        let mut guard = self.lock();
        let counters = guard.entry(key.to_string()).or_default();
        counters.events_seen += 1;
        counters.last_activity = Some(SystemTime::now());
    }

    pub fn record_action(&self, key: &str, outcome: &ExecutionOutcome) {
        let mut guard = self.lock();
        let counters = guard.entry(key.to_string()).or_default();
        counters.actions_run += 1;
        if outcome.success {
            counters.actions_ok += 1;
        } else {
            counters.actions_failed += 1;
            counters.last_error = outcome.error.clone();
        }
        counters.last_activity = Some(SystemTime::now());
    }

    pub fn get(&self, key: &str) -> Option<Counters> {
        self.lock().get(key).cloned()
    }

    /// Copy of all counters, ordered by key.
    pub fn snapshot(&self) -> BTreeMap<String, Counters> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Counters>> {
        // Counters stay usable even if a holder panicked mid-update.
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
