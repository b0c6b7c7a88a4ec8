//! Bounded undo history for the canvas.
//!
//! Undo is snapshot-based: after every committing mutation the canvas pushes
//! a deep copy of the whole shape collection. Restoring pops the top entry
//! (the state being undone away from) and hands back the one below it. Shape
//! counts per image are small (tens, not thousands), so whole-collection
//! copies are cheaper than the bookkeeping a diff-based history would need.

use crate::model::Shape;

/// Default maximum number of undo steps.
pub const DEFAULT_NUM_BACKUPS: usize = 10;

/// A bounded stack of shape-collection snapshots.
///
/// The stack holds at most `num_backups + 1` entries: `num_backups` undoable
/// edits plus the snapshot immediately preceding the oldest retained edit,
/// which the restorable check needs. A meaningful undo requires at least two
/// entries, because snapshots are taken *after* each edit.
#[derive(Debug, Clone)]
pub struct SnapshotStack {
    snapshots: Vec<Vec<Shape>>,
    num_backups: usize,
}

impl Default for SnapshotStack {
    fn default() -> Self {
        Self::new(DEFAULT_NUM_BACKUPS)
    }
}

impl SnapshotStack {
    pub fn new(num_backups: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            num_backups,
        }
    }

    /// Push a snapshot, dropping the oldest entries beyond the cap.
    pub fn push(&mut self, snapshot: Vec<Shape>) {
        log::debug!("undo: pushed snapshot of {} shapes", snapshot.len());
        self.snapshots.push(snapshot);
        while self.snapshots.len() > self.num_backups + 1 {
            self.snapshots.remove(0);
        }
    }

    /// Whether an undo is currently possible.
    pub fn is_restorable(&self) -> bool {
        self.snapshots.len() >= 2
    }

    /// Discard the top snapshot and return a copy of the one below it, which
    /// becomes the live state. The returned snapshot stays on the stack as
    /// the record of the now-live state, so undos can be chained. Returns
    /// `None` when not restorable.
    pub fn restore(&mut self) -> Option<Vec<Shape>> {
        if !self.is_restorable() {
            return None;
        }
        self.snapshots.pop();
        let snapshot = self.snapshots.last().cloned();
        log::debug!("undo: restored snapshot, {} remaining", self.snapshots.len());
        snapshot
    }

    /// Remove and return the top snapshot without restoring anything.
    /// Used to roll back a snapshot whose edit was itself cancelled
    /// (e.g. the label prompt for a new shape was dismissed).
    pub fn discard_top(&mut self) -> Option<Vec<Shape>> {
        let snapshot = self.snapshots.pop();
        if snapshot.is_some() {
            log::debug!("undo: discarded top snapshot");
        }
        snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
