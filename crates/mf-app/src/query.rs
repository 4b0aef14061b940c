//! Read-only views of the network for display.

use mf_core::Real;
use mf_graph::{Container, FlowEdge, GraphStore};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Text shown in place of a concentration that is not a number.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display form of a concentration: four decimals, or "N/A" when not finite.
pub fn format_concentration(concentration: Real) -> String {
    if concentration.is_finite() {
        format!("{concentration:.4}")
    } else {
        NOT_AVAILABLE.to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContainerView {
    pub name: String,
    pub liquid_level: Real,
    pub max_capacity: Real,
    /// Level over capacity. Unclamped, so it can exceed 1.
    pub fill_fraction: Real,
    pub concentration: Real,
    pub concentration_text: String,
    pub lethal_concentration: Real,
    /// Concentration over the lethal concentration, for colour scaling.
    pub lethal_fraction: Real,
    pub in_rate: Real,
    pub out_rate: Real,
    pub max_out_rate: Real,
}

impl ContainerView {
    pub fn of(container: &Container) -> Self {
        let state = &container.state;
        Self {
            name: container.name().to_string(),
            liquid_level: state.liquid_level,
            max_capacity: container.max_capacity(),
            fill_fraction: state.liquid_level / container.max_capacity(),
            concentration: state.concentration,
            concentration_text: format_concentration(state.concentration),
            lethal_concentration: container.lethal_concentration(),
            lethal_fraction: state.concentration / container.lethal_concentration(),
            in_rate: state.in_rate,
            out_rate: state.out_rate,
            max_out_rate: container.max_out_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeView {
    pub source: String,
    pub destination: String,
    pub percent: Real,
    pub rate: Real,
    pub concentration: Real,
    pub concentration_text: String,
    /// False when no container with the source name exists; the edge is inert.
    pub source_resolved: bool,
    /// False when the destination is a sink.
    pub destination_resolved: bool,
}

impl EdgeView {
    fn of(edge: &FlowEdge, store: &GraphStore) -> Self {
        Self {
            source: edge.source().to_string(),
            destination: edge.destination().to_string(),
            percent: edge.percent_out_rate(),
            rate: edge.state.rate,
            concentration: edge.state.concentration,
            concentration_text: format_concentration(edge.state.concentration),
            source_resolved: store.find_container(edge.source()).is_some(),
            destination_resolved: store.find_container(edge.destination()).is_some(),
        }
    }
}

/// Counts for a one-line status display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub containers: usize,
    pub edges: usize,
    pub inert_edges: usize,
    pub sink_edges: usize,
    pub non_finite: usize,
}

pub fn container_view(store: &GraphStore, name: &str) -> AppResult<ContainerView> {
    store
        .find_container(name)
        .map(ContainerView::of)
        .ok_or_else(|| AppError::ContainerNotFound(name.to_string()))
}

pub fn container_views(store: &GraphStore) -> Vec<ContainerView> {
    store.containers().iter().map(ContainerView::of).collect()
}

/// Edges touching `name`, inbound first.
pub fn edges_of(store: &GraphStore, name: &str) -> (Vec<EdgeView>, Vec<EdgeView>) {
    let inbound = store
        .inbound_edges(name)
        .into_iter()
        .map(|e| EdgeView::of(e, store))
        .collect();
    let outbound = store
        .outbound_edges(name)
        .into_iter()
        .map(|e| EdgeView::of(e, store))
        .collect();
    (inbound, outbound)
}

pub fn edge_views(store: &GraphStore) -> Vec<EdgeView> {
    store.edges().iter().map(|e| EdgeView::of(e, store)).collect()
}

pub fn network_summary(store: &GraphStore) -> NetworkSummary {
    let index = store.index();
    let edges = store.edges().len();
    NetworkSummary {
        containers: store.containers().len(),
        edges,
        inert_edges: (0..edges).filter(|&e| index.edge_source(e).is_none()).count(),
        sink_edges: (0..edges)
            .filter(|&e| index.edge_destination(e).is_none())
            .count(),
        non_finite: store
            .containers()
            .iter()
            .filter(|c| !c.state.concentration.is_finite())
            .count(),
    }
}
