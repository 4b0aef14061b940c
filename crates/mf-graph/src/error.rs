//! Graph-specific error types.

use mf_core::MfError;
use thiserror::Error;

use crate::validate::ValidationError;

/// Errors raised by structural edits of a [`GraphStore`](crate::GraphStore).
///
/// Unresolved names are never errors; they are reported as `None` or leave
/// the affected edge inert.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The validation gate refused the container.
    #[error("container '{name}' rejected: {reason}")]
    Rejected {
        name: String,
        reason: ValidationError,
    },

    /// A container with this name is already in the store.
    #[error("container '{0}' already exists")]
    DuplicateContainer(String),

    /// An edge percentage is not a finite fraction in [0, 1].
    #[error("invalid output percentage on edge {from} -> {to}: {cause}")]
    InvalidPercent {
        from: String,
        to: String,
        #[source]
        cause: MfError,
    },

    /// The adjacency index disagrees with a full name scan.
    #[error("adjacency index inconsistent: {what}")]
    InconsistentIndex { what: String },
}

impl GraphError {
    /// The validation reason, if this is a gate rejection.
    pub fn validation_reason(&self) -> Option<ValidationError> {
        match self {
            GraphError::Rejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
