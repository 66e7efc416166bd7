//! Replay queue: recorded decisions that steer a fresh run back to a frontier

use std::collections::VecDeque;

use crate::domain::{Branch, Element, PathStack};

/// FIFO of branch decisions, consumed one per comparison while replaying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayQueue {
    decisions: VecDeque<bool>,
}

impl ReplayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decisions leading to the frontier of `path`, whose top state was just flipped.
    ///
    /// Every ancestor contributes its recorded decision in path order; a trailing
    /// `false` then enters the flipped state's `No` side.
    pub fn for_frontier<T: Element>(path: &PathStack<T>) -> Self {
        let mut queue = Self::new();
        if path.is_empty() {
            return queue;
        }
        for state in path.ancestors() {
            queue.enqueue(state.decision());
        }
        queue.enqueue(false);
        queue
    }

    pub fn enqueue(&mut self, decision: bool) {
        self.decisions.push_back(decision);
    }

    pub fn dequeue(&mut self) -> Option<bool> {
        self.decisions.pop_front()
    }

    pub fn first(&self) -> Option<bool> {
        self.decisions.front().copied()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl FromIterator<Branch> for ReplayQueue {
    fn from_iter<I: IntoIterator<Item = Branch>>(iter: I) -> Self {
        Self {
            decisions: iter.into_iter().map(Branch::decision).collect(),
        }
    }
}
