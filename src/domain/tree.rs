//! The finished decision tree
//!
//! Plain ownership: every internal node owns exactly two boxed children, so
//! binary completeness holds by construction once the tree exists.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::domain::{Comparison, DomainError, Element};

/// Edge from a decision node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Left child, taken when the comparison holds
    Yes,
    /// Right child, taken when it does not
    No,
}

impl Branch {
    pub fn decision(self) -> bool {
        self == Branch::Yes
    }

    pub fn label(self) -> &'static str {
        match self {
            Branch::Yes => "Yes",
            Branch::No => "No",
        }
    }
}

impl From<bool> for Branch {
    fn from(decision: bool) -> Self {
        if decision {
            Branch::Yes
        } else {
            Branch::No
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Branch {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Ok(Branch::Yes),
            "no" | "n" | "false" | "0" => Ok(Branch::No),
            _ => Err(DomainError::InvalidBranch(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecisionNode<T> {
    Decision {
        comparison: Comparison<T>,
        yes: Box<DecisionNode<T>>,
        no: Box<DecisionNode<T>>,
    },
    /// Natural end of the algorithm, holding the final ordering
    Leaf(Vec<T>),
    /// Branch that contradicts an earlier decision on its path
    Pruned,
}

impl<T: Element> DecisionNode<T> {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, DecisionNode::Decision { .. })
    }

    pub fn child(&self, branch: Branch) -> Option<&DecisionNode<T>> {
        match self {
            DecisionNode::Decision { yes, no, .. } => Some(match branch {
                Branch::Yes => &**yes,
                Branch::No => &**no,
            }),
            _ => None,
        }
    }

    /// Children in Yes, No order (empty for leaves).
    pub fn children(&self) -> Vec<(Branch, &DecisionNode<T>)> {
        match self {
            DecisionNode::Decision { yes, no, .. } => vec![(Branch::Yes, &**yes), (Branch::No, &**no)],
            _ => Vec::new(),
        }
    }

    /// Text shown for this node: comparison, space-joined data, or nothing when pruned.
    pub fn label(&self) -> String {
        match self {
            DecisionNode::Decision { comparison, .. } => comparison.to_string(),
            DecisionNode::Leaf(data) => data.iter().join(" "),
            DecisionNode::Pruned => String::new(),
        }
    }

    fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(|(_, child)| child.depth())
            .max()
            .unwrap_or(0)
    }
}

/// One root-to-leaf path.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPath<'a, T> {
    pub steps: Vec<(&'a Comparison<T>, Branch)>,
    /// Final ordering, `None` for a pruned leaf
    pub leaf: Option<&'a [T]>,
}

impl<T: Element> DecisionPath<'_, T> {
    pub fn branches(&self) -> Vec<Branch> {
        self.steps.iter().map(|(_, branch)| *branch).collect()
    }

    pub fn is_pruned(&self) -> bool {
        self.leaf.is_none()
    }
}

impl<T: Element> fmt::Display for DecisionPath<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps = self
            .steps
            .iter()
            .map(|(comparison, branch)| format!("{comparison} [{branch}]"))
            .join(" -> ");
        let leaf = match self.leaf {
            Some(data) => data.iter().join(" "),
            None => "(pruned)".to_string(),
        };
        if steps.is_empty() {
            write!(f, "{leaf}")
        } else {
            write!(f, "{steps} => {leaf}")
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub depth: usize,
    pub decisions: usize,
    pub leaves: usize,
    pub pruned: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<T> {
    root: DecisionNode<T>,
}

impl<T: Element> DecisionTree<T> {
    pub fn new(root: DecisionNode<T>) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &DecisionNode<T> {
        &self.root
    }

    /// Node levels on the longest root-to-leaf path (a lone leaf has depth 1).
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Preorder traversal, Yes before No.
    pub fn iter(&self) -> TreeIter<'_, T> {
        TreeIter {
            stack: vec![&self.root],
        }
    }

    pub fn decision_count(&self) -> usize {
        self.iter().filter(|node| !node.is_leaf()).count()
    }

    pub fn leaf_count(&self) -> usize {
        self.iter()
            .filter(|node| matches!(node, DecisionNode::Leaf(_)))
            .count()
    }

    pub fn pruned_count(&self) -> usize {
        self.iter()
            .filter(|node| matches!(node, DecisionNode::Pruned))
            .count()
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            depth: self.depth(),
            decisions: self.decision_count(),
            leaves: self.leaf_count(),
            pruned: self.pruned_count(),
        }
    }

    /// Final orderings of all data leaves, left to right.
    pub fn orderings(&self) -> Vec<&[T]> {
        self.iter()
            .filter_map(|node| match node {
                DecisionNode::Leaf(data) => Some(data.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Every root-to-leaf path, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn paths(&self) -> Vec<DecisionPath<'_, T>> {
        let mut paths = Vec::new();
        let mut stack = vec![(&self.root, Vec::new())];

        while let Some((node, steps)) = stack.pop() {
            match node {
                DecisionNode::Decision { comparison, yes, no } => {
                    let mut no_steps = steps.clone();
                    no_steps.push((comparison, Branch::No));
                    stack.push((&**no, no_steps));
                    let mut yes_steps = steps;
                    yes_steps.push((comparison, Branch::Yes));
                    stack.push((&**yes, yes_steps));
                }
                DecisionNode::Leaf(data) => paths.push(DecisionPath {
                    steps,
                    leaf: Some(data.as_slice()),
                }),
                DecisionNode::Pruned => paths.push(DecisionPath { steps, leaf: None }),
            }
        }

        paths
    }

    /// Binary completeness: `internal + 1 == leaves` for a full binary tree.
    pub fn is_complete(&self) -> bool {
        self.decision_count() + 1 == self.leaf_count() + self.pruned_count()
    }

    /// SHA-256 over the canonical preorder serialization.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for node in self.iter() {
            let token = match node {
                DecisionNode::Decision { .. } => format!("D({})", node.label()),
                DecisionNode::Leaf(_) => format!("L({})", node.label()),
                DecisionNode::Pruned => "P".to_string(),
            };
            hasher.update(token.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

pub struct TreeIter<'a, T> {
    stack: Vec<&'a DecisionNode<T>>,
}

impl<'a, T: Element> Iterator for TreeIter<'a, T> {
    type Item = &'a DecisionNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push No first so Yes is visited first
        for (_, child) in node.children().into_iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}
