//! Domain layer: comparisons, branch bookkeeping and the decision tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod comparison;
pub mod error;
pub mod path_stack;
pub mod replay_queue;
pub mod tree;

pub use arena::{DecisionArena, NodeKind};
pub use comparison::{Comparison, Element, Operator};
pub use error::{DomainError, DomainResult};
pub use path_stack::{BranchState, PathStack};
pub use replay_queue::ReplayQueue;
pub use tree::{Branch, DecisionNode, DecisionPath, DecisionTree, TreeStats};
