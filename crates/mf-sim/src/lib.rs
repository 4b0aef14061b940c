//! Tick-driven mixing simulation for mixflow networks.
//!
//! Provides:
//! - Closed-form first-order mixing update per container
//! - Two-phase step engine (containers on previous-tick edges, then edges)
//! - Fixed-tick run loop with observer hook and terminal stop
//! - Scenario loading, reset to baseline, and clearing

pub mod container;
pub mod engine;
pub mod error;
pub mod events;
pub mod observer;
pub mod scenario;
pub mod sim;

// Re-exports for public API
pub use container::{CONCENTRATION_RATE_SCALE, Inflow, TICK_DT, TICKS_PER_TIME_UNIT};
pub use engine::step_once;
pub use error::{SimError, SimResult};
pub use events::{StepReport, StopReason, TerminalContainer};
pub use observer::{NoopObserver, TickObserver};
pub use scenario::{EdgeSpec, Scenario, clear, load_scenario, reset};
pub use sim::{ContainerSample, EdgeSample, NetworkSnapshot, SimOptions, SimRecord, run_sim};
