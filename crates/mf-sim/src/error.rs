//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while driving a simulation.
///
/// Numeric degeneracy and the terminal concentration are not errors; they
/// show up as NaN state and in [`StepReport`](crate::StepReport).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Graph error: {0}")]
    Graph(#[from] mf_graph::GraphError),
}

pub type SimResult<T> = Result<T, SimError>;
