//! Shared application service layer for mixflow.
//!
//! This crate provides one interface for interactive and headless
//! frontends: an editing/stepping session, scenario file handling, a paced
//! run loop with progress events, and display views.

pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;
pub mod session;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, TickProgress};
pub use query::{
    ContainerView, EdgeView, NOT_AVAILABLE, NetworkSummary, container_view, container_views,
    edge_views, edges_of, format_concentration, network_summary,
};
pub use run_service::{RunRequest, RunResponse, describe_stop, run, run_with_progress};
pub use scenario_service::{
    ScenarioSummary, compile_scenario, load_into, load_scenario_file, save_scenario_file,
    summarize,
};
pub use session::Session;
