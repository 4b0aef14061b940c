//! Adjacency index over the name-linked graph.
//!
//! Resolves names to positions once per structural mutation so the step
//! engine can walk inbound/outbound edges without scanning.

use std::collections::HashMap;

use mf_core::{ContainerId, EdgeId, Id};

use crate::graph::{Container, FlowEdge};

/// Positions of containers and edges, plus resolved adjacency.
///
/// All lists hold positions into the store's container and edge vectors.
/// Edge lists are in edge insertion order.
#[derive(Debug, Clone, Default)]
pub struct IndexMap {
    /// Container name -> position.
    name_to_pos: HashMap<String, usize>,

    /// Reverse lookup: ContainerId -> position.
    /// Sized to max(ContainerId.index) + 1; None if that ID doesn't exist.
    container_to_pos: Vec<Option<usize>>,

    /// Reverse lookup: EdgeId -> position.
    edge_to_pos: Vec<Option<usize>>,

    /// Per container position: edges whose destination is that container.
    inbound: Vec<Vec<usize>>,

    /// Per container position: edges whose source is that container.
    outbound: Vec<Vec<usize>>,

    /// Per edge position: resolved source container, if any.
    edge_source: Vec<Option<usize>>,

    /// Per edge position: resolved destination container, if any.
    edge_destination: Vec<Option<usize>>,
}

impl IndexMap {
    /// Build the index from the store's collections.
    pub fn build(containers: &[Container], edges: &[FlowEdge]) -> Self {
        let name_to_pos: HashMap<String, usize> = containers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name().to_string(), i))
            .collect();

        let container_to_pos = reverse_lookup(containers.iter().map(Container::id));
        let edge_to_pos = reverse_lookup(edges.iter().map(FlowEdge::id));

        let mut inbound = vec![Vec::new(); containers.len()];
        let mut outbound = vec![Vec::new(); containers.len()];
        let mut edge_source = Vec::with_capacity(edges.len());
        let mut edge_destination = Vec::with_capacity(edges.len());

        for (e, edge) in edges.iter().enumerate() {
            let src = name_to_pos.get(edge.source()).copied();
            let dst = name_to_pos.get(edge.destination()).copied();
            if let Some(s) = src {
                outbound[s].push(e);
            }
            if let Some(d) = dst {
                inbound[d].push(e);
            }
            edge_source.push(src);
            edge_destination.push(dst);
        }

        Self {
            name_to_pos,
            container_to_pos,
            edge_to_pos,
            inbound,
            outbound,
            edge_source,
            edge_destination,
        }
    }

    /// Number of containers in the index.
    pub fn container_count(&self) -> usize {
        self.inbound.len()
    }

    /// Number of edges in the index.
    pub fn edge_count(&self) -> usize {
        self.edge_source.len()
    }

    /// Position of the container called `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.name_to_pos.get(name).copied()
    }

    /// Position of a container handle.
    pub fn container_pos(&self, id: ContainerId) -> Option<usize> {
        self.container_to_pos
            .get(id.index() as usize)
            .and_then(|&opt| opt)
    }

    /// Position of an edge handle.
    pub fn edge_pos(&self, id: EdgeId) -> Option<usize> {
        self.edge_to_pos.get(id.index() as usize).and_then(|&opt| opt)
    }

    /// Inbound edge positions of the container at `pos`.
    pub fn inbound(&self, pos: usize) -> &[usize] {
        self.inbound.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outbound edge positions of the container at `pos`.
    pub fn outbound(&self, pos: usize) -> &[usize] {
        self.outbound.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Source container position of the edge at `edge_pos`.
    pub fn edge_source(&self, edge_pos: usize) -> Option<usize> {
        self.edge_source.get(edge_pos).copied().flatten()
    }

    /// Destination container position of the edge at `edge_pos`.
    pub fn edge_destination(&self, edge_pos: usize) -> Option<usize> {
        self.edge_destination.get(edge_pos).copied().flatten()
    }
}

fn reverse_lookup(ids: impl Iterator<Item = Id>) -> Vec<Option<usize>> {
    let mut lookup = Vec::new();
    for (pos, id) in ids.enumerate() {
        let idx = id.index() as usize;
        if idx >= lookup.len() {
            lookup.resize(idx + 1, None);
        }
        lookup[idx] = Some(pos);
    }
    lookup
}
