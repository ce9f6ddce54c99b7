//! Linear undo/redo history of full snapshots.

use std::collections::VecDeque;

/// Two snapshot stacks, most recent last.
///
/// Undo and redo swap the caller's current value with the top of one stack
/// and push it onto the other, so a snapshot is only ever moved, never copied
/// or lost. The optional limit only drops the oldest undo entry on commit.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo_stack: VecDeque<T>,
    redo_stack: Vec<T>,
    limit: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: None,
        }
    }
}

impl<T> History<T> {
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record the state as it was before a mutation. Clears redo.
    pub fn commit(&mut self, snapshot: T) {
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
    }

    /// Swap `current` with the latest undo snapshot. Returns false when empty.
    pub fn undo(&mut self, current: &mut T) -> bool {
        let Some(previous) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(std::mem::replace(current, previous));
        true
    }

    /// Swap `current` with the latest redo snapshot. Returns false when empty.
    pub fn redo(&mut self, current: &mut T) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push_back(std::mem::replace(current, next));
        true
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
