//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add engine and service context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("replay diverged at depth {depth}: expected `{expected}`, algorithm asked `{actual}`")]
    ReplayDiverged {
        depth: usize,
        expected: String,
        actual: String,
    },

    #[error("algorithm finished with {remaining} recorded decision(s) left to replay")]
    ReplayUnderrun { remaining: usize },

    #[error("enumeration already ran on this engine")]
    AlreadyEnumerated,

    #[error("enumeration has not run yet")]
    NotEnumerated,

    #[error("dataset has {len} elements, maximum is {max} (see max_elements)")]
    DatasetTooLarge { len: usize, max: usize },

    #[error("duplicate element: {0:?}")]
    DuplicateElement(String),

    #[error("unknown algorithm: {0:?} (expected bubble, insertion or shell)")]
    UnknownAlgorithm(String),

    #[error("unknown output format: {0:?} (expected latex or text)")]
    UnknownFormat(String),

    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
