//! Undo/redo history of project snapshots.

use crate::canvas::Project;
use std::collections::VecDeque;

/// Bounded undo/redo stacks.
///
/// Committed mutations push the pre-mutation project. Live mutations only
/// remember the project as it was before the first of them (the pending
/// base), so a whole gesture collapses into one entry on commit.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Project>,
    redo_stack: Vec<Project>,
    pending: Option<Project>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(50)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            pending: None,
            limit: limit.max(1),
        }
    }

    /// Record a committed mutation, given the project before it.
    ///
    /// Pending live changes fold into the same entry.
    pub fn record(&mut self, before: &Project) {
        let base = self.pending.take().unwrap_or_else(|| before.clone());
        self.push_undo(base);
        self.redo_stack.clear();
    }

    /// Note that a live mutation is about to happen.
    pub fn begin_live(&mut self, current: &Project) {
        if self.pending.is_none() {
            self.pending = Some(current.clone());
        }
    }

    /// Register everything since the first live mutation as one undo step.
    ///
    /// With nothing pending this still pushes an (empty) step.
    pub fn commit(&mut self, current: &Project) {
        self.record(current);
        log::debug!("History checkpoint ({} undo steps)", self.undo_stack.len());
    }

    /// Whether live changes are waiting for a commit.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Step back. Returns the project to restore, or `None` at the boundary.
    pub fn undo(&mut self, current: &Project) -> Option<Project> {
        if self.pending.is_some() {
            self.commit(current);
        }
        let snapshot = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.clone());
        Some(snapshot)
    }

    /// Step forward. Returns the project to restore, or `None` at the boundary.
    ///
    /// Pending live changes are an edit of their own: they are committed
    /// first, which discards the redo stack.
    pub fn redo(&mut self, current: &Project) -> Option<Project> {
        if self.pending.is_some() {
            self.commit(current);
        }
        let snapshot = self.redo_stack.pop()?;
        self.push_undo(current.clone());
        Some(snapshot)
    }

    /// Check if undo is available (including uncommitted live changes).
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty() || self.pending.is_some()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history, e.g. after loading a different project.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.pending = None;
    }

    fn push_undo(&mut self, snapshot: Project) {
        self.undo_stack.push_back(snapshot);
        // Limit undo history size
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
        }
    }
}
