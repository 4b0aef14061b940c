//! mf-core: stable foundation for mixflow.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - ids (stable compact handles for containers and edges)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{MfError, MfResult};
pub use ids::*;
pub use numeric::*;
