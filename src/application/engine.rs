//! Decision engine: drives an algorithm through every outcome of its comparisons
//!
//! A running algorithm cannot be paused, so every unexplored branch is reached by
//! restarting the algorithm on a fresh copy of the base data and replaying the
//! recorded decisions that lead to it. Past the replayed prefix the engine
//! explores freely, always taking `Yes` first, until the run ends in a leaf.
//! Backtracking then flips the deepest state still on its `Yes` side.

use tracing::{debug, instrument, trace};

use crate::application::{Algorithm, ApplicationError, ApplicationResult, Decide, Renderer};
use crate::domain::{
    Comparison, DecisionArena, DecisionTree, Element, NodeKind, Operator, PathStack, ReplayQueue,
    BranchState,
};

/// Answer given to every comparison once the current run has produced its leaf.
const FLUSH_DECISION: bool = false;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Free choice: new comparisons become new nodes, `Yes` first
    Exploring,
    /// Feeding recorded decisions to reach the frontier again
    Replaying,
}

/// Everything the comparison primitive touches, kept apart from the algorithm
/// so both can be borrowed during a run.
#[derive(Debug)]
struct Explorer<T> {
    path: PathStack<T>,
    replay: ReplayQueue,
    arena: DecisionArena<T>,
    mode: Mode,
    /// A leaf was attached in this run; remaining calls are structurally ignored
    flushing: bool,
    fault: Option<ApplicationError>,
}

impl<T: Element> Explorer<T> {
    fn new() -> Self {
        Self {
            path: PathStack::new(),
            replay: ReplayQueue::new(),
            arena: DecisionArena::new(),
            mode: Mode::Exploring,
            flushing: false,
            fault: None,
        }
    }

    /// Hand back a recorded `decision`, checking the algorithm asked what it asked before.
    fn replay_next(&mut self, comparison: Comparison<T>, decision: bool) -> bool {
        // `decision` was already dequeued
        let depth = self.path.len().saturating_sub(self.replay.len() + 1);

        let diverged = self
            .path
            .get(depth)
            .map(BranchState::posed)
            .filter(|expected| **expected != comparison)
            .map(ToString::to_string);
        if let Some(expected) = diverged {
            self.fail(ApplicationError::ReplayDiverged {
                depth,
                expected,
                actual: comparison.to_string(),
            });
            return FLUSH_DECISION;
        }

        trace!(depth, decision, "replay: {}", comparison);
        if self.replay.is_empty() {
            debug!(depth, "replay complete, exploring");
            self.mode = Mode::Exploring;
        }
        decision
    }

    fn explore(&mut self, comparison: Comparison<T>) -> bool {
        let Some(frontier) = self.path.top() else {
            // First comparison of the first run becomes the root
            return match self.arena.insert_root(NodeKind::Decision(comparison.clone())) {
                Ok(idx) => {
                    trace!("root: {}", comparison);
                    self.path.push(BranchState::new(idx, comparison));
                    true
                }
                Err(e) => {
                    self.fail(e.into());
                    FLUSH_DECISION
                }
            };
        };
        let (parent, branch) = (frontier.node(), frontier.branch());

        if self.path.frontier_contradicted() {
            trace!(depth = self.path.len(), "contradiction, pruning before {}", comparison);
            self.terminate(NodeKind::Pruned);
            return FLUSH_DECISION;
        }

        match self
            .arena
            .attach(parent, branch, NodeKind::Decision(comparison.clone()))
        {
            Ok(idx) => {
                trace!(depth = self.path.len(), %branch, "node: {}", comparison);
                self.path.push(BranchState::new(idx, comparison));
                true
            }
            Err(e) => {
                self.fail(e.into());
                FLUSH_DECISION
            }
        }
    }

    /// Attach a leaf to the frontier's active branch and start flushing.
    fn terminate(&mut self, kind: NodeKind<T>) {
        let attached = match self.path.top() {
            Some(frontier) => self.arena.attach(frontier.node(), frontier.branch(), kind),
            // The algorithm finished without asking anything
            None => self.arena.insert_root(kind),
        };
        if let Err(e) = attached {
            self.fail(e.into());
        }
        self.flushing = true;
    }

    fn fail(&mut self, error: ApplicationError) {
        debug!("engine fault: {}", error);
        if self.fault.is_none() {
            self.fault = Some(error);
        }
        self.flushing = true;
    }

    /// Called after the algorithm returned; attaches the leaf unless one exists.
    fn finish_run(&mut self, data: &[T]) -> ApplicationResult<()> {
        if let Some(fault) = self.fault.take() {
            return Err(fault);
        }
        if !self.replay.is_empty() {
            return Err(ApplicationError::ReplayUnderrun {
                remaining: self.replay.len(),
            });
        }
        if !self.flushing {
            if self.path.frontier_contradicted() {
                self.terminate(NodeKind::Pruned);
            } else {
                self.terminate(NodeKind::Leaf(data.to_vec()));
            }
        }
        match self.fault.take() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }

    /// Move to the next unexplored branch; false once the path stack is empty.
    fn backtrack(&mut self) -> bool {
        let Some(frontier) = self.path.unwind_explored() else {
            return false;
        };
        frontier.flip();
        debug!("backtrack: now assuming {}", frontier.comparison());

        self.replay = ReplayQueue::for_frontier(&self.path);
        self.mode = Mode::Replaying;
        self.flushing = false;
        trace!(depth = self.path.len(), "replaying {} decision(s)", self.replay.len());
        true
    }
}

impl<T: Element> Decide<T> for Explorer<T> {
    fn decide(&mut self, left: &T, op: Operator, right: &T) -> bool {
        if self.flushing {
            return FLUSH_DECISION;
        }
        let comparison = Comparison::new(left.clone(), op, right.clone());
        // The queue is only filled while replaying and the mode flips when it drains
        match self.replay.dequeue() {
            Some(decision) => self.replay_next(comparison, decision),
            None => self.explore(comparison),
        }
    }
}

/// Enumerates the full decision tree of one algorithm on one base dataset.
pub struct DecisionEngine<T: Element> {
    algorithm: Box<dyn Algorithm<T>>,
    base_data: Vec<T>,
    explorer: Explorer<T>,
    runs: usize,
    started: bool,
    tree: Option<DecisionTree<T>>,
}

impl<T: Element> DecisionEngine<T> {
    pub fn new(algorithm: Box<dyn Algorithm<T>>, base_data: Vec<T>) -> Self {
        Self {
            algorithm,
            base_data,
            explorer: Explorer::new(),
            runs: 0,
            started: false,
            tree: None,
        }
    }

    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.name()
    }

    pub fn base_data(&self) -> &[T] {
        &self.base_data
    }

    pub fn mode(&self) -> Mode {
        self.explorer.mode
    }

    pub fn is_flushing(&self) -> bool {
        self.explorer.flushing
    }

    /// Number of times the algorithm was invoked.
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn tree(&self) -> Option<&DecisionTree<T>> {
        self.tree.as_ref()
    }

    pub fn into_tree(self) -> ApplicationResult<DecisionTree<T>> {
        self.tree.ok_or(ApplicationError::NotEnumerated)
    }

    /// Run the algorithm until every reachable branch has been visited.
    ///
    /// May be called once per engine.
    #[instrument(level = "debug", skip(self), fields(algorithm = self.algorithm.name()))]
    pub fn run_to_completion(&mut self) -> ApplicationResult<&DecisionTree<T>> {
        if self.started {
            return Err(ApplicationError::AlreadyEnumerated);
        }
        self.started = true;

        loop {
            let mut data = self.base_data.clone();
            self.algorithm.run(&mut data, &mut self.explorer);
            self.runs += 1;
            self.explorer.finish_run(&data)?;
            trace!(run = self.runs, "run finished with {:?}", data);

            if !self.explorer.backtrack() {
                break;
            }
        }

        let arena = std::mem::take(&mut self.explorer.arena);
        let tree = arena.into_tree()?;
        debug!(
            runs = self.runs,
            decisions = tree.decision_count(),
            leaves = tree.leaf_count(),
            pruned = tree.pruned_count(),
            "enumeration complete"
        );
        Ok(&*self.tree.insert(tree))
    }

    /// Hand the finished tree to `renderer`.
    pub fn render(&self, renderer: &dyn Renderer<T>) -> ApplicationResult<String> {
        let tree = self.tree.as_ref().ok_or(ApplicationError::NotEnumerated)?;
        Ok(renderer.render(tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{BubbleSort, InsertionSort};
    use crate::domain::{Branch, DecisionNode};
    use std::cell::Cell;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Asks `data[0] > data[1]`, then the same pair again as `<` after a possible swap.
    struct AskTwice;

    impl Algorithm<String> for AskTwice {
        fn name(&self) -> &'static str {
            "ask-twice"
        }

        fn run(&self, data: &mut [String], decide: &mut dyn Decide<String>) {
            if decide.gt(&data[0], &data[1]) {
                data.swap(0, 1);
            }
            decide.lt(&data[1], &data[0]);
        }
    }

    /// Asks one comparison on the first run and a different one afterwards.
    struct Fickle {
        calls: Cell<usize>,
        skip_later: bool,
    }

    impl Algorithm<String> for Fickle {
        fn name(&self) -> &'static str {
            "fickle"
        }

        fn run(&self, data: &mut [String], decide: &mut dyn Decide<String>) {
            let call = self.calls.get();
            self.calls.set(call + 1);
            if call == 0 {
                decide.gt(&data[0], &data[1]);
            } else if !self.skip_later {
                decide.gt(&data[1], &data[0]);
            }
        }
    }

    #[test]
    fn given_two_elements_when_insertion_sort_enumerated_then_root_with_two_leaves() {
        let mut engine = DecisionEngine::new(Box::new(InsertionSort), strings(&["b", "a"]));

        let tree = engine.run_to_completion().unwrap().clone();

        let DecisionNode::Decision { comparison, yes, no } = tree.root() else {
            panic!("root should be a decision: {:?}", tree.root());
        };
        assert_eq!(comparison.to_string(), "b > a");
        assert_eq!(**yes, DecisionNode::Leaf(strings(&["a", "b"])));
        assert_eq!(**no, DecisionNode::Leaf(strings(&["b", "a"])));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.decision_count(), 1);
        assert_eq!(engine.runs(), 2);
    }

    #[test]
    fn given_negated_repeat_when_enumerated_then_prunes_contradicting_sides() {
        let mut engine = DecisionEngine::new(Box::new(AskTwice), strings(&["a", "b"]));

        let tree = engine.run_to_completion().unwrap();

        // a > b [Yes] swaps to [b, a], so a < b is asked and its Yes side contradicts
        // a > b [No] keeps [a, b], so b < a is asked and its Yes side contradicts
        let yes = tree.root().child(Branch::Yes).unwrap();
        let no = tree.root().child(Branch::No).unwrap();
        assert_eq!(yes.label(), "a < b");
        assert_eq!(yes.child(Branch::Yes), Some(&DecisionNode::Pruned));
        assert_eq!(yes.child(Branch::No), Some(&DecisionNode::Leaf(strings(&["b", "a"]))));
        assert_eq!(no.label(), "b < a");
        assert_eq!(no.child(Branch::Yes), Some(&DecisionNode::Pruned));
        assert_eq!(no.child(Branch::No), Some(&DecisionNode::Leaf(strings(&["a", "b"]))));
        assert_eq!(tree.pruned_count(), 2);
    }

    #[test]
    fn given_empty_dataset_when_enumerated_then_single_leaf() {
        let mut engine = DecisionEngine::new(Box::new(BubbleSort), Vec::<String>::new());

        let tree = engine.run_to_completion().unwrap();

        assert_eq!(tree.root(), &DecisionNode::Leaf(Vec::new()));
        assert_eq!(engine.runs(), 1);
    }

    #[test]
    fn given_explorer_when_stepping_runs_then_follows_state_machine() {
        let mut explorer: Explorer<String> = Explorer::new();
        let (a, b) = ("a".to_string(), "b".to_string());
        assert_eq!(explorer.mode, Mode::Exploring);

        // first run: root, Yes
        assert!(explorer.decide(&a, Operator::Greater, &b));
        explorer.finish_run(&strings(&["b", "a"])).unwrap();
        assert!(explorer.flushing);
        assert!(!explorer.decide(&a, Operator::Greater, &b));
        assert_eq!(explorer.arena.len(), 2);

        // backtrack: flip root, replay a single `false`
        assert!(explorer.backtrack());
        assert_eq!(explorer.mode, Mode::Replaying);
        assert!(!explorer.flushing);
        assert_eq!(explorer.replay.len(), 1);

        assert!(!explorer.decide(&a, Operator::Greater, &b));
        assert_eq!(explorer.mode, Mode::Exploring);
        explorer.finish_run(&strings(&["a", "b"])).unwrap();

        assert!(!explorer.backtrack());
        assert!(explorer.path.is_empty());
        assert_eq!(explorer.arena.len(), 3);
    }

    #[test]
    fn given_engine_when_enumerating_then_public_state_tracks_lifecycle() {
        let mut engine = DecisionEngine::new(Box::new(BubbleSort), strings(&["c", "b", "a"]));
        assert_eq!(engine.mode(), Mode::Exploring);
        assert!(!engine.is_flushing());
        assert_eq!(engine.runs(), 0);
        assert!(engine.tree().is_none());

        engine.run_to_completion().unwrap();

        // The last run ended in a leaf and nothing was left to backtrack into
        assert_eq!(engine.mode(), Mode::Exploring);
        assert!(engine.is_flushing());
        assert_eq!(engine.runs(), 8);
    }

    #[test]
    fn given_replay_when_last_decision_consumed_then_explores_new_comparisons() {
        let mut explorer: Explorer<String> = Explorer::new();
        let (a, b, c) = ("a".to_string(), "b".to_string(), "c".to_string());

        assert!(explorer.decide(&a, Operator::Greater, &b));
        explorer.finish_run(&strings(&["b", "a"])).unwrap();
        assert!(explorer.backtrack());

        // replayed: root on its No side
        assert!(!explorer.decide(&a, Operator::Greater, &b));
        assert!(explorer.replay.is_empty());
        // explored: a new node under root's No branch, Yes first
        assert!(explorer.decide(&b, Operator::Greater, &c));
        assert_eq!(explorer.path.len(), 2);
        assert_eq!(explorer.arena.len(), 3);
    }

    #[test]
    fn given_nondeterministic_algorithm_when_replaying_then_divergence_error() {
        let fickle = Fickle {
            calls: Cell::new(0),
            skip_later: false,
        };
        let mut engine = DecisionEngine::new(Box::new(fickle), strings(&["a", "b"]));

        let err = engine.run_to_completion().unwrap_err();

        assert!(
            matches!(err, ApplicationError::ReplayDiverged { depth: 0, ref expected, ref actual }
                if expected == "a > b" && actual == "b > a"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn given_algorithm_finishing_early_when_replaying_then_underrun_error() {
        let fickle = Fickle {
            calls: Cell::new(0),
            skip_later: true,
        };
        let mut engine = DecisionEngine::new(Box::new(fickle), strings(&["a", "b"]));

        let err = engine.run_to_completion().unwrap_err();

        assert!(matches!(err, ApplicationError::ReplayUnderrun { remaining: 1 }));
    }

    #[test]
    fn given_finished_engine_when_run_again_then_already_enumerated() {
        let mut engine = DecisionEngine::new(Box::new(BubbleSort), strings(&["b", "a"]));
        engine.run_to_completion().unwrap();

        assert!(matches!(
            engine.run_to_completion(),
            Err(ApplicationError::AlreadyEnumerated)
        ));
    }

    #[test]
    fn given_fresh_engine_when_rendering_then_not_enumerated() {
        let engine = DecisionEngine::new(Box::new(BubbleSort), strings(&["b", "a"]));
        let renderer = crate::application::TextRenderer;

        assert!(matches!(
            engine.render(&renderer),
            Err(ApplicationError::NotEnumerated)
        ));
        assert!(matches!(engine.into_tree(), Err(ApplicationError::NotEnumerated)));
    }
}
