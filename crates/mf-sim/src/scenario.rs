//! Whole-network operations: load a prebuilt layout, reset, clear.

use mf_core::Real;
use mf_graph::{ContainerSpec, GraphStore};
use tracing::info;

use crate::error::SimResult;

/// A directed edge in a scenario layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub percent: Real,
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>, percent: Real) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            percent,
        }
    }
}

/// A complete network layout, ready to be built into a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub containers: Vec<ContainerSpec>,
    pub edges: Vec<EdgeSpec>,
}

/// Replace the store contents with `scenario`.
///
/// All edges are queued before any container is created so every container
/// passes the gate with its full output set. If any edge or container is
/// refused, the store is left empty and the error is returned.
pub fn load_scenario(store: &mut GraphStore, scenario: &Scenario) -> SimResult<()> {
    store.clear();
    if let Err(err) = build_into(store, scenario) {
        store.clear();
        return Err(err);
    }
    info!(
        scenario = %scenario.name,
        containers = store.containers().len(),
        edges = store.edges().len(),
        "scenario loaded"
    );
    Ok(())
}

fn build_into(store: &mut GraphStore, scenario: &Scenario) -> SimResult<()> {
    for edge in &scenario.edges {
        store.add_edge(edge.from.as_str(), edge.to.as_str(), edge.percent)?;
    }
    for spec in &scenario.containers {
        store.add_container(spec.clone())?;
    }
    Ok(())
}

/// Put every container back to its baseline and re-derive edge states.
///
/// Topology is untouched. Calling it twice is the same as calling it once.
pub fn reset(store: &mut GraphStore) {
    let (containers, edges, index) = store.parts_mut();
    for container in containers.iter_mut() {
        container.restore_baseline();
    }
    for (e, edge) in edges.iter_mut().enumerate() {
        if let Some(src) = index.edge_source(e) {
            edge.follow_source(&containers[src].state);
        }
    }
    info!(containers = containers.len(), "network reset to baseline");
}

/// Remove every container and edge.
pub fn clear(store: &mut GraphStore) {
    store.clear();
    info!("network cleared");
}
