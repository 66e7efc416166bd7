//! CLI-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Io { .. } => crate::exitcode::IOERR,
            CliError::Write { .. } => crate::exitcode::CANTCREAT,
            CliError::Application(e) => match e {
                ApplicationError::DatasetTooLarge { .. } | ApplicationError::DuplicateElement(_) => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::UnknownAlgorithm(_) | ApplicationError::UnknownFormat(_) => {
                    crate::exitcode::USAGE
                }
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::Domain(_)
                | ApplicationError::ReplayDiverged { .. }
                | ApplicationError::ReplayUnderrun { .. }
                | ApplicationError::AlreadyEnumerated
                | ApplicationError::NotEnumerated => crate::exitcode::SOFTWARE,
            },
        }
    }
}
