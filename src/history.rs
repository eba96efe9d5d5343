//! Linear undo/redo history of whole-document snapshots
//!
//! The history starts with one empty snapshot. Committing after an undo
//! drops the redo branch. Snapshots are deep copies, so later edits to the
//! live shape list never leak into stored states.

use crate::model::Shape;

#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Shape>>,
    cursor: usize,
    /// Max stored snapshots, None = unbounded
    limit: Option<usize>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(None)
    }
}

impl History {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            snapshots: vec![Vec::new()],
            cursor: 0,
            limit: limit.map(|l| l.max(1)),
        }
    }

    /// Record a new state at the cursor, discarding anything after it
    pub fn commit(&mut self, shapes: &[Shape]) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(shapes.to_vec());

        if let Some(limit) = self.limit {
            let excess = self.snapshots.len().saturating_sub(limit);
            if excess > 0 {
                self.snapshots.drain(..excess);
            }
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot, returning it. None at the first snapshot.
    pub fn undo(&mut self) -> Option<Vec<Shape>> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].clone())
    }

    /// Step forward one snapshot, returning it. None at the last snapshot.
    pub fn redo(&mut self) -> Option<Vec<Shape>> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Apply an edit to every shape in every snapshot.
    ///
    /// Used when a referenced entity (a layer) disappears, so undo never
    /// restores a dangling reference.
    pub fn rewrite_all(&mut self, mut edit: impl FnMut(&mut Shape)) {
        for snapshot in self.snapshots.iter_mut() {
            snapshot.iter_mut().for_each(&mut edit);
        }
    }

    /// Snapshot at the cursor (the last committed state)
    pub fn current(&self) -> &[Shape] {
        &self.snapshots[self.cursor]
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}
