//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Branch;

/// Domain errors represent violations of the decision tree model.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unsupported operator: {0:?} (expected one of >, <, ==, !=)")]
    UnsupportedOperator(String),

    #[error("invalid branch: {0:?} (expected yes or no)")]
    InvalidBranch(String),

    #[error("tree root already set")]
    RootAlreadySet,

    #[error("unknown tree node")]
    UnknownNode,

    #[error("branch {branch} of node {node:?} is already occupied")]
    BranchOccupied { node: String, branch: Branch },

    #[error("node {node:?} has no {branch} child")]
    IncompleteNode { node: String, branch: Branch },

    #[error("tree is empty")]
    EmptyTree,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
