// src/engine/debounce.rs

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::types::EventKind;
use crate::watch::ChangeEvent;

/// Per-path record of the last accepted trigger. Owned by one worker.
#[derive(Debug, Default)]
pub struct DebounceTable {
    window: Duration,
    last: HashMap<PathBuf, Instant>,
}

impl DebounceTable {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: HashMap::new(),
        }
    }

    /// Decide whether `event` should be dispatched at `now`.
    ///
    /// An event is suppressed if the same path was accepted less than one
    /// window ago. Deletes (and the vacated side of a move) always clear the
    /// path's entry so a later create there starts fresh.
    pub fn accept(&mut self, event: &ChangeEvent, now: Instant) -> bool {
        let suppressed = !self.window.is_zero()
            && self
                .last
                .get(&event.path)
                .is_some_and(|at| now.saturating_duration_since(*at) < self.window);

        if let Some(prev) = &event.prev_path {
            self.last.remove(prev);
        }

        if event.kind == EventKind::Delete {
            self.last.remove(&event.path);
        } else if !suppressed && !self.window.is_zero() {
            self.last.insert(event.path.clone(), now);
        }

        !suppressed
    }

    pub fn len(&self) -> usize {
        self.last.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_empty()
    }
}
