// src/watch/diff.rs

//! Snapshot diffing with move detection.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::types::EventKind;
use crate::watch::path_utils::relative_str;
use crate::watch::snapshot::{FileRecord, Signature, Snapshot};

/// A single change between two snapshots of the same root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path of the entry (the new path for moves).
    pub path: PathBuf,
    /// `path` relative to the watch root, `/`-separated.
    pub rel_path: String,
    /// Previous absolute path; only set for moves.
    pub prev_path: Option<PathBuf>,
    pub kind: EventKind,
    /// Current record, or the last known record for deletes.
    pub record: FileRecord,
    /// Time since the entry's mtime. Always zero for deletes.
    pub age: Duration,
}

impl ChangeEvent {
    pub fn new(root: &Path, kind: EventKind, record: FileRecord, now: SystemTime) -> Self {
        let age = match kind {
            EventKind::Delete => Duration::ZERO,
            _ => age_at(&record, now),
        };
        Self {
            rel_path: relative_str(root, &record.path),
            path: record.path.clone(),
            prev_path: None,
            kind,
            record,
            age,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.record.is_dir
    }
}

fn age_at(record: &FileRecord, now: SystemTime) -> Duration {
    now.duration_since(record.modified).unwrap_or(Duration::ZERO)
}

/// Compare two snapshots of `root`, using the current time for ages.
pub fn diff(root: &Path, previous: &Snapshot, current: &Snapshot) -> Vec<ChangeEvent> {
    diff_at(root, previous, current, SystemTime::now())
}

/// Compare two snapshots of `root`.
///
/// Output order is modifies, moves, creates, deletes, each in ascending
/// path order. A new path whose signature matches a vanished path is
/// reported as a move; when several vanished paths share that signature the
/// smallest one is paired first, and each vanished path pairs at most once.
pub fn diff_at(
    root: &Path,
    previous: &Snapshot,
    current: &Snapshot,
    now: SystemTime,
) -> Vec<ChangeEvent> {
    // Delete candidates indexed by signature; BTreeSet gives the tie-break.
    let mut vanished: BTreeMap<Signature, BTreeSet<&Path>> = BTreeMap::new();
    for record in previous.records() {
        if !current.contains(&record.path) {
            vanished
                .entry(record.signature())
                .or_default()
                .insert(record.path.as_path());
        }
    }

    let mut modifies = Vec::new();
    let mut moves = Vec::new();
    let mut creates = Vec::new();

    for record in current.records() {
        if let Some(prev) = previous.get(&record.path) {
            if prev.differs_from(record) {
                modifies.push(ChangeEvent::new(root, EventKind::Modify, record.clone(), now));
            }
            continue;
        }

        match claim_vanished(&mut vanished, record) {
            Some(old_path) => {
                let mut event = ChangeEvent::new(root, EventKind::Move, record.clone(), now);
                event.prev_path = Some(old_path);
                moves.push(event);
            }
            None => creates.push(ChangeEvent::new(root, EventKind::Create, record.clone(), now)),
        }
    }

    let mut deletes: Vec<&FileRecord> = vanished
        .into_values()
        .flatten()
        .filter_map(|path| previous.get(path))
        .collect();
    deletes.sort_by(|a, b| a.path.cmp(&b.path));

    let mut events = modifies;
    events.append(&mut moves);
    events.append(&mut creates);
    events.extend(
        deletes
            .into_iter()
            .map(|record| ChangeEvent::new(root, EventKind::Delete, record.clone(), now)),
    );
    events
}

/// Take the smallest vanished path with the same signature as `record`.
fn claim_vanished(
    vanished: &mut BTreeMap<Signature, BTreeSet<&Path>>,
    record: &FileRecord,
) -> Option<PathBuf> {
    let signature = record.signature();
    let candidates = vanished.get_mut(&signature)?;
    let old_path = candidates
        .iter()
        .copied()
        .find(|candidate| *candidate != record.path.as_path())?;
    candidates.remove(old_path);
    if candidates.is_empty() {
        vanished.remove(&signature);
    }
    Some(old_path.to_path_buf())
}
