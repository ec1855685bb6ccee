// src/filter/matcher.rs

//! Selects which of a watch's actions apply to a change event.

use tracing::trace;

use crate::config::{ActionFilter, ActionSpec, EntryFilter, WatchConfig};
use crate::watch::path_utils::is_hidden;
use crate::watch::ChangeEvent;

/// Stateless action matcher, shared by all workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Return the actions of `watch` whose filters accept `event`, in
    /// configured order. With `stop_on_first_match` at most one action is
    /// returned.
    pub fn select<'w>(&self, event: &ChangeEvent, watch: &'w WatchConfig) -> Vec<&'w ActionSpec> {
        let mut selected = Vec::new();

        for action in &watch.actions {
            if !accepts(&action.filter, event) {
                trace!(action = %action.name, path = %event.rel_path, "action filtered out");
                continue;
            }
            selected.push(action);
            if watch.stop_on_first_match {
                break;
            }
        }

        selected
    }
}

/// Run every filter check against the event, in a fixed order.
pub fn accepts(filter: &ActionFilter, event: &ChangeEvent) -> bool {
    if !filter.events.contains(&event.kind) {
        return false;
    }
    if !filter.include.is_empty() && !filter.include.is_match(&event.rel_path) {
        return false;
    }
    if !filter.exclude.is_empty() && filter.exclude.is_match(&event.rel_path) {
        return false;
    }
    if !bounds_pass(filter, event) {
        return false;
    }
    match filter.entries {
        EntryFilter::FilesOnly if event.is_dir() => return false,
        EntryFilter::DirsOnly if !event.is_dir() => return false,
        _ => {}
    }
    if filter.ignore_hidden && is_hidden(&event.rel_path) {
        return false;
    }
    true
}

fn bounds_pass(filter: &ActionFilter, event: &ChangeEvent) -> bool {
    let size = event.record.size;
    if filter.min_size.is_some_and(|min| size < min) {
        return false;
    }
    if filter.max_size.is_some_and(|max| size > max) {
        return false;
    }
    if filter.min_age.is_some_and(|min| event.age < min) {
        return false;
    }
    if filter.max_age.is_some_and(|max| event.age > max) {
        return false;
    }
    true
}
