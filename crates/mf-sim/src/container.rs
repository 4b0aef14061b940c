//! Well-mixed container update with a closed-form first-order mixing law.
//!
//! Over one tick the substance amount `S` obeys `dS/dt = c_in - out_rate * S`.
//! With both rates held constant its exact solution is
//! `S' = Y + (S - Y) * exp(-out_rate * dt)`, where `Y = c_in / out_rate` is
//! the amount the container is driven toward.

use mf_core::Real;
use mf_graph::{Container, FlowEdge};

/// Ticks per unit of simulated time.
pub const TICKS_PER_TIME_UNIT: Real = 60.0;

/// Length of one tick in simulated time units.
pub const TICK_DT: Real = 1.0 / TICKS_PER_TIME_UNIT;

/// Fixed scale applied to the inbound solute rate.
pub const CONCENTRATION_RATE_SCALE: Real = 100.0;

/// Flow totals a container sees at the start of a tick.
///
/// Built from edge states before any edge is updated in the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Inflow {
    pub in_rate: Real,
    pub out_rate: Real,
    pub concentration_rate_in: Real,
    pub inbound_count: usize,
}

impl Inflow {
    /// Sum the given inbound and outbound edge positions.
    pub fn gather(edges: &[FlowEdge], inbound: &[usize], outbound: &[usize]) -> Self {
        let mut flow = Inflow {
            inbound_count: inbound.len(),
            ..Inflow::default()
        };
        for &e in inbound {
            let state = &edges[e].state;
            flow.in_rate += state.rate;
            flow.concentration_rate_in +=
                state.rate * state.concentration * CONCENTRATION_RATE_SCALE;
        }
        for &e in outbound {
            flow.out_rate += edges[e].state.rate;
        }
        flow
    }
}

/// Substance amount after one tick of mixing.
///
/// A zero `out_rate` yields NaN; callers let it propagate.
pub fn mixed_substance(substance: Real, concentration_rate_in: Real, out_rate: Real) -> Real {
    let target = concentration_rate_in / out_rate;
    target + (substance - target) * (-out_rate * TICK_DT).exp()
}

/// Advance a container by one tick given its inflow totals.
pub fn advance(container: &mut Container, flow: &Inflow) {
    let max_out = container.max_out_rate();
    let state = &mut container.state;

    let new_level = state.liquid_level + flow.in_rate - flow.out_rate;
    let substance = if flow.inbound_count == 0 {
        // Nothing flows in, so there is nothing to mix.
        new_level
    } else {
        mixed_substance(state.substance(), flow.concentration_rate_in, flow.out_rate)
    };

    state.in_rate = flow.in_rate;
    state.liquid_level = new_level;
    state.concentration = if new_level == 0.0 {
        0.0
    } else {
        substance / new_level
    };
    state.out_rate = new_level.min(max_out);
}
