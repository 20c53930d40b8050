//! Error types for approval-sync

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while synchronizing approvals
#[derive(Debug, Error)]
pub enum Error {
    /// Review service returned a change record with missing or mistyped fields
    #[error("invalid change record: {0}")]
    Schema(String),

    /// Query did not match exactly one change
    #[error("expected exactly one change matching '{change}', found {count}")]
    Lookup {
        /// Change identifier that was queried
        change: String,
        /// Number of records returned
        count: usize,
    },

    /// An approval entry could not be parsed
    #[error("approval #{index}: {reason}")]
    ApprovalParse {
        /// Position of the entry in the approval list
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// The commit message already reflects the current approvals
    #[error("commit message is already up to date")]
    NoChangeNeeded,

    /// Operator declined at the confirmation prompt
    #[error("aborted by operator")]
    OperatorAbort,

    /// The change can no longer receive new patchsets
    #[error("change {0} is not open")]
    ChangeNotOpen(u64),

    /// An external command (git, ssh, rm) failed
    #[error("{step} failed: `{command}` exited with {status}\n{output}")]
    ExternalCommand {
        /// Pipeline step that issued the command
        step: String,
        /// Rendered command line
        command: String,
        /// Exit status description
        status: String,
        /// Captured stderr (or stdout when stderr is empty)
        output: String,
    },

    /// Working directory does not look like one this tool created
    #[error("refusing to remove unexpected working directory {}", .0.display())]
    UnsafeWorkDir(PathBuf),

    /// Configuration missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP request to the review service failed
    #[error("review service error: {0}")]
    ReviewApi(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Broken internal invariant
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error ends the run without counting as a failure
    ///
    /// `NoChangeNeeded` and `OperatorAbort` stop the pipeline before any
    /// mutation and exit successfully.
    pub const fn is_clean_stop(&self) -> bool {
        matches!(self, Self::NoChangeNeeded | Self::OperatorAbort)
    }
}
