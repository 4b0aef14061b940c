//! Scenario file loading, saving, and compilation into simulation input.

use std::path::Path;

use mf_graph::ContainerSpec;
use mf_project::{RunDef, ScenarioFile};
use mf_sim::{EdgeSpec, Scenario};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::session::Session;

/// Summary of a scenario file for listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSummary {
    pub name: String,
    pub version: u32,
    pub container_count: usize,
    pub edge_count: usize,
    /// Edge destinations that are not containers, in first-seen order.
    pub sinks: Vec<String>,
    pub run: Option<RunDef>,
}

enum Format {
    Yaml,
    Json,
}

fn format_of(path: &Path) -> AppResult<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(AppError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load and validate a scenario file, choosing the format by extension.
pub fn load_scenario_file(path: &Path) -> AppResult<ScenarioFile> {
    let file = match format_of(path)? {
        Format::Yaml => mf_project::load_yaml(path)?,
        Format::Json => mf_project::load_json(path)?,
    };
    info!(path = %path.display(), name = %file.name, "scenario file loaded");
    Ok(file)
}

/// Validate and write a scenario file, choosing the format by extension.
pub fn save_scenario_file(path: &Path, file: &ScenarioFile) -> AppResult<()> {
    match format_of(path)? {
        Format::Yaml => mf_project::save_yaml(path, file)?,
        Format::Json => mf_project::save_json(path, file)?,
    }
    Ok(())
}

/// Translate a file into simulation input. Order is preserved.
pub fn compile_scenario(file: &ScenarioFile) -> Scenario {
    Scenario {
        name: file.name.clone(),
        containers: file
            .containers
            .iter()
            .map(|c| {
                ContainerSpec::new(
                    c.name.as_str(),
                    c.max_out_rate,
                    c.start_level,
                    c.max_capacity,
                    c.start_concentration,
                    c.lethal_concentration,
                )
            })
            .collect(),
        edges: file
            .edges
            .iter()
            .map(|e| EdgeSpec::new(e.from.as_str(), e.to.as_str(), e.percent))
            .collect(),
    }
}

/// Build `file` into the session, replacing what was there.
pub fn load_into(session: &mut Session, file: &ScenarioFile) -> AppResult<()> {
    session.load_scenario(&compile_scenario(file))
}

pub fn summarize(file: &ScenarioFile) -> ScenarioSummary {
    let mut sinks: Vec<String> = Vec::new();
    for edge in &file.edges {
        let is_container = file.containers.iter().any(|c| c.name == edge.to);
        if !is_container && !sinks.contains(&edge.to) {
            sinks.push(edge.to.clone());
        }
    }
    ScenarioSummary {
        name: file.name.clone(),
        version: file.version,
        container_count: file.containers.len(),
        edge_count: file.edges.len(),
        sinks,
        run: file.run.clone(),
    }
}
