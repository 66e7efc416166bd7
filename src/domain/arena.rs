use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::{
    Branch, Comparison, DecisionNode, DecisionTree, DomainError, DomainResult, Element,
};

/// Payload of a node while the tree is still growing.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<T> {
    Decision(Comparison<T>),
    Leaf(Vec<T>),
    Pruned,
}

impl<T: Element> NodeKind<T> {
    fn describe(&self) -> String {
        match self {
            NodeKind::Decision(comparison) => comparison.to_string(),
            NodeKind::Leaf(data) => format!("{data:?}"),
            NodeKind::Pruned => "pruned".to_string(),
        }
    }
}

/// Node in the arena-based build-time tree; children are linked downward only.
#[derive(Debug)]
struct ArenaNode<T> {
    kind: NodeKind<T>,
    yes: Option<Index>,
    no: Option<Index>,
}

impl<T> ArenaNode<T> {
    fn new(kind: NodeKind<T>) -> Self {
        Self {
            kind,
            yes: None,
            no: None,
        }
    }

    fn child(&self, branch: Branch) -> Option<Index> {
        match branch {
            Branch::Yes => self.yes,
            Branch::No => self.no,
        }
    }
}

/// Arena-based tree the engine grows while enumerating.
///
/// Branch states keep stable indices into it across runs; once enumeration is
/// done it is converted into an owned [`DecisionTree`].
#[derive(Debug)]
pub struct DecisionArena<T> {
    arena: Arena<ArenaNode<T>>,
    root: Option<Index>,
}

impl<T> Default for DecisionArena<T> {
    fn default() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }
}

impl<T: Element> DecisionArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_root(&mut self, kind: NodeKind<T>) -> DomainResult<Index> {
        if self.root.is_some() {
            return Err(DomainError::RootAlreadySet);
        }
        let idx = self.arena.insert(ArenaNode::new(kind));
        self.root = Some(idx);
        Ok(idx)
    }

    /// Attach a new node under `parent` on `branch`.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: Index, branch: Branch, kind: NodeKind<T>) -> DomainResult<Index> {
        let parent_node = self.arena.get(parent).ok_or(DomainError::UnknownNode)?;
        if parent_node.child(branch).is_some() {
            return Err(DomainError::BranchOccupied {
                node: parent_node.kind.describe(),
                branch,
            });
        }

        let idx = self.arena.insert(ArenaNode::new(kind));
        let parent_node = self.arena.get_mut(parent).ok_or(DomainError::UnknownNode)?;
        match branch {
            Branch::Yes => parent_node.yes = Some(idx),
            Branch::No => parent_node.no = Some(idx),
        }
        Ok(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Convert into the owned tree, failing if any decision node lacks a child.
    #[instrument(level = "debug", skip(self))]
    pub fn into_tree(mut self) -> DomainResult<DecisionTree<T>> {
        let root = self.root.ok_or(DomainError::EmptyTree)?;
        let root = self.take_subtree(root)?;
        Ok(DecisionTree::new(root))
    }

    fn take_subtree(&mut self, idx: Index) -> DomainResult<DecisionNode<T>> {
        let node = self.arena.remove(idx).ok_or(DomainError::UnknownNode)?;
        match node.kind {
            NodeKind::Decision(comparison) => {
                let yes = node.yes.ok_or_else(|| DomainError::IncompleteNode {
                    node: comparison.to_string(),
                    branch: Branch::Yes,
                })?;
                let no = node.no.ok_or_else(|| DomainError::IncompleteNode {
                    node: comparison.to_string(),
                    branch: Branch::No,
                })?;
                Ok(DecisionNode::Decision {
                    yes: Box::new(self.take_subtree(yes)?),
                    no: Box::new(self.take_subtree(no)?),
                    comparison,
                })
            }
            NodeKind::Leaf(data) => Ok(DecisionNode::Leaf(data)),
            NodeKind::Pruned => Ok(DecisionNode::Pruned),
        }
    }
}
