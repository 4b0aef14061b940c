//! mf-graph: graph store for mixflow networks.
//!
//! Provides:
//! - Container and flow edge data structures
//! - The owned `GraphStore` with name-based linking and stable handles
//! - An adjacency index rebuilt on structural mutation
//! - The container validation gate and form-style container drafts
//!
//! # Example
//!
//! ```
//! use mf_graph::{ContainerSpec, GraphStore};
//!
//! let mut store = GraphStore::new();
//! store.add_edge("A", "out", 1.0).unwrap();
//! store
//!     .add_container(ContainerSpec::new("A", 0.5, 500.0, 500.0, 1.0, 0.5))
//!     .unwrap();
//!
//! assert_eq!(store.containers().len(), 1);
//! assert_eq!(store.outbound_edges("A").len(), 1);
//! assert!(store.find_container("out").is_none());
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod indexing;
pub mod validate;

// Re-exports for ergonomics
pub use builder::{ContainerDraft, PendingEdge};
pub use error::{GraphError, GraphResult};
pub use graph::{Container, ContainerSpec, ContainerState, EdgeState, FlowEdge, GraphStore};
pub use indexing::IndexMap;
pub use validate::{ValidationError, validate_container};
