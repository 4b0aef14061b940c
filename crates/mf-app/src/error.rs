//! Error types for the mf-app service layer.

use std::path::PathBuf;

use mf_core::EdgeId;
use mf_graph::GraphError;
use mf_project::ProjectError;
use mf_sim::SimError;

/// Application error type that wraps errors from the backend crates
/// and gives frontends one error to display.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Refused structural edit. Displays the backend reason unchanged.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Simulation error: {0}")]
    Simulation(SimError),

    #[error("Scenario error: {0}")]
    Project(#[from] ProjectError),

    #[error("Unsupported scenario format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for mf-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<SimError> for AppError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::Graph(graph) => AppError::Graph(graph),
            other => AppError::Simulation(other),
        }
    }
}

impl AppError {
    /// The gate reason, when a container was refused.
    pub fn rejection_reason(&self) -> Option<mf_graph::ValidationError> {
        match self {
            AppError::Graph(graph) => graph.validation_reason(),
            _ => None,
        }
    }
}
