//! Bounded undo/redo stacks of whole-document snapshots. Snapshots share
//! every layer that was not edited between them.

use lottie_data::model::AnimationDocument;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Arc<AnimationDocument>>,
    future: Vec<Arc<AnimationDocument>>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        History {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Records `snapshot` as the state to return to on undo. Any redo stack is
    /// discarded; past the limit the oldest entry is dropped.
    pub fn push(&mut self, snapshot: Arc<AnimationDocument>) {
        self.future.clear();
        if self.limit == 0 {
            return;
        }
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }

    /// Steps back from `current`, which becomes redoable.
    pub fn undo(&mut self, current: Arc<AnimationDocument>) -> Option<Arc<AnimationDocument>> {
        let prev = self.past.pop_back()?;
        self.future.push(current);
        Some(prev)
    }

    /// Steps forward from `current`, which becomes undoable again.
    pub fn redo(&mut self, current: Arc<AnimationDocument>) -> Option<Arc<AnimationDocument>> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn len(&self) -> usize {
        self.past.len()
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }
}
