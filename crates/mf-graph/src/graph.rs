//! Core graph data structures and the owned graph store.

use mf_core::{ContainerId, EdgeId, IdAllocator, Real, ensure_fraction};
use tracing::debug;

use crate::builder::ContainerDraft;
use crate::error::{GraphError, GraphResult};
use crate::indexing::IndexMap;
use crate::validate::{self, validate_container};

/// Creation-time description of a container.
///
/// Kept on the container it created, where it serves as the baseline
/// snapshot for resets.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub name: String,
    pub max_out_rate: Real,
    pub start_level: Real,
    pub max_capacity: Real,
    pub start_concentration: Real,
    /// Display scaling only, never used by the physics.
    pub lethal_concentration: Real,
}

impl ContainerSpec {
    pub fn new(
        name: impl Into<String>,
        max_out_rate: Real,
        start_level: Real,
        max_capacity: Real,
        start_concentration: Real,
        lethal_concentration: Real,
    ) -> Self {
        Self {
            name: name.into(),
            max_out_rate,
            start_level,
            max_capacity,
            start_concentration,
            lethal_concentration,
        }
    }
}

/// Mutable per-tick state of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerState {
    pub liquid_level: Real,
    /// Solute mass fraction. May exceed 1 transiently, or be NaN when the
    /// container has inflow but no outflow.
    pub concentration: Real,
    pub in_rate: Real,
    /// Always `min(liquid_level, max_out_rate)`.
    pub out_rate: Real,
}

impl ContainerState {
    /// State a container starts in (and returns to on reset).
    pub fn initial(spec: &ContainerSpec) -> Self {
        Self {
            liquid_level: spec.start_level,
            concentration: spec.start_concentration,
            in_rate: 0.0,
            out_rate: spec.start_level.min(spec.max_out_rate),
        }
    }

    /// Substance amount currently held.
    pub fn substance(&self) -> Real {
        self.concentration * self.liquid_level
    }
}

/// A mixing tank.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: ContainerId,
    spec: ContainerSpec,
    pub state: ContainerState,
}

impl Container {
    fn new(id: ContainerId, spec: ContainerSpec) -> Self {
        let state = ContainerState::initial(&spec);
        Self { id, spec, state }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// The values captured when the container was created.
    pub fn baseline(&self) -> &ContainerSpec {
        &self.spec
    }

    pub fn max_out_rate(&self) -> Real {
        self.spec.max_out_rate
    }

    pub fn max_capacity(&self) -> Real {
        self.spec.max_capacity
    }

    pub fn lethal_concentration(&self) -> Real {
        self.spec.lethal_concentration
    }

    /// Output rate this container can deliver at the given level.
    pub fn out_rate_at(&self, level: Real) -> Real {
        level.min(self.spec.max_out_rate)
    }

    /// Restore level and concentration from the baseline snapshot.
    pub fn restore_baseline(&mut self) {
        self.state = ContainerState::initial(&self.spec);
    }
}

/// Mutable per-tick state of a flow edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeState {
    pub rate: Real,
    pub concentration: Real,
}

/// A directed, percentage-based pipe between two container names.
///
/// Neither endpoint has to exist: a missing source makes the edge inert, a
/// missing destination makes it a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    id: EdgeId,
    source: String,
    destination: String,
    percent_out_rate: Real,
    pub state: EdgeState,
}

impl FlowEdge {
    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Fraction of the source's output rate carried by this edge.
    pub fn percent_out_rate(&self) -> Real {
        self.percent_out_rate
    }

    /// Take rate and concentration from the source container's state.
    pub fn follow_source(&mut self, source: &ContainerState) {
        self.state.rate = self.percent_out_rate * source.out_rate;
        self.state.concentration = source.concentration;
    }
}

/// The set of all containers (creation order) and flow edges (insertion order).
///
/// Containers and edges are linked by name. Every structural mutation
/// rebuilds the adjacency index, so queries and ticks never scan.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    containers: Vec<Container>,
    edges: Vec<FlowEdge>,
    index: IndexMap,
    container_ids: IdAllocator,
    edge_ids: IdAllocator,
}

impl GraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All containers in creation order.
    pub fn containers(&self) -> &[Container] {
        &self.containers
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn index(&self) -> &IndexMap {
        &self.index
    }

    /// Whether the store holds neither containers nor edges.
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.edges.is_empty()
    }

    /// Baseline snapshots in container creation order.
    pub fn baselines(&self) -> impl Iterator<Item = &ContainerSpec> {
        self.containers.iter().map(Container::baseline)
    }

    /// Look up a container by handle.
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.index
            .container_pos(id)
            .map(|pos| &self.containers[pos])
    }

    /// Look up an edge by handle.
    pub fn edge(&self, id: EdgeId) -> Option<&FlowEdge> {
        self.index.edge_pos(id).map(|pos| &self.edges[pos])
    }

    /// Look up a container by name. Not finding one is a normal outcome.
    pub fn find_container(&self, name: &str) -> Option<&Container> {
        self.index
            .position_of(name)
            .map(|pos| &self.containers[pos])
    }

    /// Edges whose destination is `name`.
    pub fn inbound_edges(&self, name: &str) -> Vec<&FlowEdge> {
        match self.index.position_of(name) {
            Some(pos) => self
                .index
                .inbound(pos)
                .iter()
                .map(|&e| &self.edges[e])
                .collect(),
            // Sinks have no index entry but may still receive edges.
            None => self
                .edges
                .iter()
                .filter(|e| e.destination == name)
                .collect(),
        }
    }

    /// Edges whose source is `name`, including queued ones.
    pub fn outbound_edges(&self, name: &str) -> Vec<&FlowEdge> {
        match self.index.position_of(name) {
            Some(pos) => self
                .index
                .outbound(pos)
                .iter()
                .map(|&e| &self.edges[e])
                .collect(),
            None => self.edges.iter().filter(|e| e.source == name).collect(),
        }
    }

    /// Total output percentage of edges leaving `name`.
    pub fn outbound_percent_sum(&self, name: &str) -> Real {
        self.edges
            .iter()
            .filter(|e| e.source == name)
            .map(|e| e.percent_out_rate)
            .sum()
    }

    /// Add an edge. The source does not need to exist yet.
    ///
    /// If the source exists the edge immediately carries its share of the
    /// source's output; otherwise it stays at zero until the source is created.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
        percent: Real,
    ) -> GraphResult<EdgeId> {
        let source = source.into();
        let destination = destination.into();
        let percent = checked_percent(&source, &destination, percent)?;

        let id = self.edge_ids.allocate();
        let mut edge = FlowEdge {
            id,
            source,
            destination,
            percent_out_rate: percent,
            state: EdgeState::default(),
        };
        if let Some(src) = self.find_container(&edge.source) {
            edge.follow_source(&src.state);
        }
        debug!(
            edge = %id,
            from = %edge.source,
            to = %edge.destination,
            percent,
            "edge added"
        );
        self.edges.push(edge);
        self.rebuild_index();
        Ok(id)
    }

    /// Validate and insert a container, binding any queued outbound edges.
    pub fn add_container(&mut self, spec: ContainerSpec) -> GraphResult<ContainerId> {
        self.commit(ContainerDraft::new(spec))
    }

    /// Validate a draft and insert its edges and container together.
    ///
    /// The gate sees the draft's outputs plus any edges already queued under
    /// the same source name. On rejection the store is left untouched.
    pub fn commit(&mut self, draft: ContainerDraft) -> GraphResult<ContainerId> {
        let (spec, outputs) = draft.into_parts();

        if self.index.position_of(&spec.name).is_some() {
            return Err(GraphError::DuplicateContainer(spec.name));
        }

        let mut percents = Vec::with_capacity(outputs.len());
        for out in &outputs {
            percents.push(checked_percent(&spec.name, &out.destination, out.percent)?);
        }

        let pending = self.outbound_percent_sum(&spec.name) + percents.iter().sum::<Real>();
        if let Err(reason) = validate_container(&spec, pending) {
            debug!(name = %spec.name, %reason, "container rejected");
            return Err(GraphError::Rejected {
                name: spec.name,
                reason,
            });
        }

        for (out, percent) in outputs.into_iter().zip(percents) {
            let id = self.edge_ids.allocate();
            self.edges.push(FlowEdge {
                id,
                source: spec.name.clone(),
                destination: out.destination,
                percent_out_rate: percent,
                state: EdgeState::default(),
            });
        }

        let id = self.container_ids.allocate();
        let container = Container::new(id, spec);

        let mut bound = 0usize;
        for edge in self
            .edges
            .iter_mut()
            .filter(|e| e.source == container.spec.name)
        {
            edge.follow_source(&container.state);
            bound += 1;
        }

        debug!(container = %id, name = %container.spec.name, bound, "container added");
        self.containers.push(container);
        self.rebuild_index();
        Ok(id)
    }

    /// Remove a container and every edge whose source it is.
    ///
    /// Edges pointing at the container stay and become sinks.
    pub fn remove_container(&mut self, name: &str) -> Option<Container> {
        let pos = self.index.position_of(name)?;
        let removed = self.containers.remove(pos);

        let before = self.edges.len();
        self.edges.retain(|e| e.source != name);
        let dropped = before - self.edges.len();

        debug!(name, dropped_edges = dropped, "container removed");
        self.rebuild_index();
        Some(removed)
    }

    /// Remove a single edge by handle.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<FlowEdge> {
        let pos = self.index.edge_pos(id)?;
        let removed = self.edges.remove(pos);
        debug!(edge = %id, "edge removed");
        self.rebuild_index();
        Some(removed)
    }

    /// Empty the store. Handles are not reused afterwards.
    pub fn clear(&mut self) {
        self.containers.clear();
        self.edges.clear();
        self.rebuild_index();
    }

    /// Split borrow for the step engine: states are mutable, topology is not.
    pub fn parts_mut(&mut self) -> (&mut [Container], &mut [FlowEdge], &IndexMap) {
        (&mut self.containers, &mut self.edges, &self.index)
    }

    /// Check the adjacency index against a full name scan.
    pub fn verify_index(&self) -> GraphResult<()> {
        validate::check_index(&self.containers, &self.edges, &self.index)
    }

    fn rebuild_index(&mut self) {
        self.index = IndexMap::build(&self.containers, &self.edges);
    }
}

fn checked_percent(from: &str, to: &str, percent: Real) -> GraphResult<Real> {
    ensure_fraction(percent, "edge percent").map_err(|cause| GraphError::InvalidPercent {
        from: from.to_string(),
        to: to.to_string(),
        cause,
    })
}
