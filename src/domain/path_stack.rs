//! Path stack: branch states from the tree root down to the current frontier

use generational_arena::Index;
use tracing::instrument;

use crate::domain::{Branch, Comparison, Element};

/// Bookkeeping for one internal node on the active execution path.
#[derive(Debug, Clone)]
pub struct BranchState<T> {
    /// Arena index of the internal node this state belongs to
    node: Index,
    /// Comparison exactly as the algorithm posed it
    posed: Comparison<T>,
    /// Comparison assumed true on the branch currently explored
    comparison: Comparison<T>,
    branch: Branch,
}

impl<T: Element> BranchState<T> {
    pub fn new(node: Index, comparison: Comparison<T>) -> Self {
        Self {
            node,
            posed: comparison.clone(),
            comparison,
            branch: Branch::Yes,
        }
    }

    pub fn node(&self) -> Index {
        self.node
    }

    pub fn posed(&self) -> &Comparison<T> {
        &self.posed
    }

    pub fn comparison(&self) -> &Comparison<T> {
        &self.comparison
    }

    pub fn branch(&self) -> Branch {
        self.branch
    }

    /// Decision to hand back to the algorithm when replaying through this state.
    pub fn decision(&self) -> bool {
        self.branch.decision()
    }

    pub fn is_exploring_yes(&self) -> bool {
        self.branch == Branch::Yes
    }

    /// Switch to the `No` side: the negated comparison becomes the assumed fact.
    pub fn flip(&mut self) {
        self.comparison = self.comparison.negate();
        self.branch = Branch::No;
    }
}

/// States correspond 1:1, in order, to the internal nodes along the active path.
#[derive(Debug, Clone)]
pub struct PathStack<T> {
    states: Vec<BranchState<T>>,
}

impl<T> Default for PathStack<T> {
    fn default() -> Self {
        Self { states: Vec::new() }
    }
}

impl<T: Element> PathStack<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn push(&mut self, state: BranchState<T>) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<BranchState<T>> {
        self.states.pop()
    }

    pub fn top(&self) -> Option<&BranchState<T>> {
        self.states.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut BranchState<T>> {
        self.states.last_mut()
    }

    pub fn get(&self, depth: usize) -> Option<&BranchState<T>> {
        self.states.get(depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BranchState<T>> {
        self.states.iter()
    }

    /// Every state except the frontier, root first.
    pub fn ancestors(&self) -> &[BranchState<T>] {
        match self.states.split_last() {
            Some((_, ancestors)) => ancestors,
            None => &[],
        }
    }

    /// True if the branch entered at the frontier contradicts a decision
    /// already committed further up the path.
    #[instrument(level = "trace", skip(self))]
    pub fn frontier_contradicted(&self) -> bool {
        let Some((frontier, ancestors)) = self.states.split_last() else {
            return false;
        };
        ancestors
            .iter()
            .any(|state| frontier.comparison().contradicts(state.comparison()))
    }

    /// Pop states whose `No` side is already being explored.
    ///
    /// Returns the new frontier if one with an unexplored `No` side remains.
    #[instrument(level = "trace", skip(self))]
    pub fn unwind_explored(&mut self) -> Option<&mut BranchState<T>> {
        while self.top().is_some_and(|state| !state.is_exploring_yes()) {
            self.states.pop();
        }
        self.states.last_mut()
    }
}
