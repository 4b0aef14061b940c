//! Container validation gate and index consistency checks.

use mf_core::Real;
use thiserror::Error;

use crate::error::{GraphError, GraphResult};
use crate::graph::{Container, ContainerSpec, FlowEdge};
use crate::indexing::IndexMap;

/// Reasons a container configuration is refused at creation time.
///
/// Variants are listed in the order the gate checks them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("starting liquid level cannot be less than the maximum output rate")]
    LevelBelowMaxOutRate,

    #[error("initial concentration cannot be greater than 1")]
    ConcentrationAboveOne,

    #[error("starting liquid level cannot be greater than the maximum capacity")]
    LevelAboveCapacity,

    #[error("flow outputs sum must not exceed 1")]
    OutputsExceedOne,

    #[error("maximum out rate cannot be greater than maximum capacity")]
    MaxOutRateAboveCapacity,
}

/// Check a container spec against the creation rules.
///
/// `pending_edge_percent_sum` is the total output percentage of the edges that
/// will leave this container once it exists. The first failing check wins.
pub fn validate_container(
    spec: &ContainerSpec,
    pending_edge_percent_sum: Real,
) -> Result<(), ValidationError> {
    if spec.max_out_rate > spec.start_level {
        return Err(ValidationError::LevelBelowMaxOutRate);
    }
    if spec.start_concentration > 1.0 {
        return Err(ValidationError::ConcentrationAboveOne);
    }
    if spec.start_level > spec.max_capacity {
        return Err(ValidationError::LevelAboveCapacity);
    }
    if pending_edge_percent_sum > 1.0 {
        return Err(ValidationError::OutputsExceedOne);
    }
    if spec.max_out_rate > spec.max_capacity {
        return Err(ValidationError::MaxOutRateAboveCapacity);
    }
    Ok(())
}

/// Compare an adjacency index against a full name scan of the collections.
pub(crate) fn check_index(
    containers: &[Container],
    edges: &[FlowEdge],
    index: &IndexMap,
) -> GraphResult<()> {
    if index.container_count() != containers.len() || index.edge_count() != edges.len() {
        return Err(GraphError::InconsistentIndex {
            what: format!(
                "index covers {} containers / {} edges, store has {} / {}",
                index.container_count(),
                index.edge_count(),
                containers.len(),
                edges.len()
            ),
        });
    }

    for (pos, container) in containers.iter().enumerate() {
        if index.position_of(container.name()) != Some(pos)
            || index.container_pos(container.id()) != Some(pos)
        {
            return Err(GraphError::InconsistentIndex {
                what: format!("container '{}' not indexed at {}", container.name(), pos),
            });
        }

        let scanned_in: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.destination() == container.name())
            .map(|(i, _)| i)
            .collect();
        let scanned_out: Vec<usize> = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.source() == container.name())
            .map(|(i, _)| i)
            .collect();

        if index.inbound(pos) != scanned_in.as_slice() {
            return Err(GraphError::InconsistentIndex {
                what: format!("inbound edges of '{}'", container.name()),
            });
        }
        if index.outbound(pos) != scanned_out.as_slice() {
            return Err(GraphError::InconsistentIndex {
                what: format!("outbound edges of '{}'", container.name()),
            });
        }
    }

    for (pos, edge) in edges.iter().enumerate() {
        let source = containers.iter().position(|c| c.name() == edge.source());
        let destination = containers
            .iter()
            .position(|c| c.name() == edge.destination());
        if index.edge_source(pos) != source || index.edge_destination(pos) != destination {
            return Err(GraphError::InconsistentIndex {
                what: format!(
                    "endpoints of edge {} -> {}",
                    edge.source(),
                    edge.destination()
                ),
            });
        }
    }

    Ok(())
}
