//! Container drafts: a container spec plus its queued output edges.

use mf_core::Real;

use crate::graph::ContainerSpec;
use crate::validate::{ValidationError, validate_container};

/// An output edge waiting for its source container to be committed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdge {
    pub destination: String,
    pub percent: Real,
}

/// Builder for a container and the edges leaving it.
///
/// Collect outputs with `output`/`push_output`, then hand the draft to
/// [`GraphStore::commit`](crate::GraphStore::commit), which validates the
/// whole draft and inserts edges and container together.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerDraft {
    spec: ContainerSpec,
    outputs: Vec<PendingEdge>,
}

impl ContainerDraft {
    /// Start a draft with no outputs.
    pub fn new(spec: ContainerSpec) -> Self {
        Self {
            spec,
            outputs: Vec::new(),
        }
    }

    /// Add an output edge (chaining form).
    pub fn output(mut self, destination: impl Into<String>, percent: Real) -> Self {
        self.push_output(destination, percent);
        self
    }

    /// Add an output edge.
    pub fn push_output(&mut self, destination: impl Into<String>, percent: Real) {
        self.outputs.push(PendingEdge {
            destination: destination.into(),
            percent,
        });
    }

    /// Drop all queued outputs.
    pub fn clear_outputs(&mut self) {
        self.outputs.clear();
    }

    pub fn spec(&self) -> &ContainerSpec {
        &self.spec
    }

    pub fn outputs(&self) -> &[PendingEdge] {
        &self.outputs
    }

    /// Sum of the queued output percentages.
    pub fn pending_percent_sum(&self) -> Real {
        self.outputs.iter().map(|o| o.percent).sum()
    }

    /// Run the gate against this draft alone.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_container(&self.spec, self.pending_percent_sum())
    }

    pub(crate) fn into_parts(self) -> (ContainerSpec, Vec<PendingEdge>) {
        (self.spec, self.outputs)
    }
}
