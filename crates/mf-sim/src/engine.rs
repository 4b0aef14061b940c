//! The two-phase step engine.
//!
//! Each tick runs two passes with nothing interleaved:
//! 1. **Containers**: every container is advanced from the edge states left by
//!    the previous tick.
//! 2. **Edges**: every edge with a resolvable source takes its rate and
//!    concentration from that source's freshly updated state.
//!
//! Swapping the passes changes results; the one-tick lag on edge rates is
//! part of the model.

use mf_graph::GraphStore;
use tracing::{trace, warn};

use crate::container::{Inflow, advance};
use crate::events::{StepReport, TerminalContainer, is_terminal_concentration};

/// Advance the whole network by one fixed tick.
///
/// Takes the store mutably for the full tick, so ticks on one store can
/// never overlap.
pub fn step_once(store: &mut GraphStore) -> StepReport {
    let (containers, edges, index) = store.parts_mut();
    let mut report = StepReport::default();

    // Phase 1: edges are read-only here.
    for (pos, container) in containers.iter_mut().enumerate() {
        let flow = Inflow::gather(edges, index.inbound(pos), index.outbound(pos));
        advance(container, &flow);

        let concentration = container.state.concentration;
        if !concentration.is_finite() {
            report.non_finite += 1;
        }
        if is_terminal_concentration(concentration) {
            report.terminal.push(TerminalContainer {
                id: container.id(),
                name: container.name().to_string(),
                concentration,
            });
        }
    }

    // Phase 2: containers are read-only here.
    for (e, edge) in edges.iter_mut().enumerate() {
        if let Some(src) = index.edge_source(e) {
            edge.follow_source(&containers[src].state);
        }
    }

    if report.non_finite > 0 {
        warn!(
            count = report.non_finite,
            "containers with non-finite concentration"
        );
    }
    trace!(
        containers = containers.len(),
        edges = edges.len(),
        terminal = report.terminal.len(),
        "tick complete"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_core::{Tolerances, nearly_equal};
    use mf_graph::ContainerSpec;

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-9,
            rel: 1e-9,
        }
    }

    /// A (0.5, 500, 500, 1) -> B (0.1, 300, 800, 0) -> out
    fn two_tanks() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_edge("A", "B", 1.0).unwrap();
        store.add_edge("B", "out", 1.0).unwrap();
        store
            .add_container(ContainerSpec::new("A", 0.5, 500.0, 500.0, 1.0, 0.5))
            .unwrap();
        store
            .add_container(ContainerSpec::new("B", 0.1, 300.0, 800.0, 0.0, 0.5))
            .unwrap();
        store
    }

    #[test]
    fn source_tank_after_one_tick() {
        let mut store = two_tanks();
        let report = step_once(&mut store);
        assert!(!report.is_terminal());

        let a = store.find_container("A").unwrap();
        assert_eq!(a.state.out_rate, 0.5);
        assert_eq!(a.state.liquid_level, 499.5);
        assert_eq!(a.state.concentration, 1.0);

        let edge = store.outbound_edges("A")[0];
        assert_eq!(edge.state.rate, 0.5);
        assert_eq!(edge.state.concentration, 1.0);
    }

    #[test]
    fn receiving_tank_mixes_with_closed_form() {
        let mut store = two_tanks();
        step_once(&mut store);

        let b = store.find_container("B").unwrap();
        assert_eq!(b.state.in_rate, 0.5);
        assert!(nearly_equal(b.state.liquid_level, 300.4, tol()));

        let substance = 500.0 * (1.0 - (-0.1_f64 / 60.0).exp());
        assert!(nearly_equal(
            b.state.concentration,
            substance / 300.4,
            tol()
        ));
    }

    #[test]
    fn containers_read_previous_tick_edge_rates() {
        // A drains in two ticks: 1.0 -> 0.5 -> 0.0
        let mut store = GraphStore::new();
        store.add_edge("A", "B", 1.0).unwrap();
        store.add_edge("B", "out", 1.0).unwrap();
        store
            .add_container(ContainerSpec::new("A", 0.5, 1.0, 1.0, 1.0, 0.5))
            .unwrap();
        store
            .add_container(ContainerSpec::new("B", 0.1, 300.0, 800.0, 0.0, 0.5))
            .unwrap();

        step_once(&mut store);
        step_once(&mut store);

        // After tick 2 A is empty and its edge carries nothing...
        assert_eq!(store.find_container("A").unwrap().state.liquid_level, 0.0);
        assert_eq!(store.outbound_edges("A")[0].state.rate, 0.0);
        // ...but B consumed the rate the edge had after tick 1.
        assert_eq!(store.find_container("B").unwrap().state.in_rate, 0.5);

        step_once(&mut store);
        assert_eq!(store.find_container("B").unwrap().state.in_rate, 0.0);
    }

    #[test]
    fn inflow_without_outflow_goes_nan() {
        let mut store = GraphStore::new();
        store.add_edge("A", "Sink", 1.0).unwrap();
        store
            .add_container(ContainerSpec::new("A", 0.5, 500.0, 500.0, 1.0, 0.5))
            .unwrap();
        store
            .add_container(ContainerSpec::new("Sink", 0.1, 300.0, 800.0, 0.0, 0.5))
            .unwrap();

        let report = step_once(&mut store);
        let sink = store.find_container("Sink").unwrap();
        assert!(sink.state.concentration.is_nan());
        assert_eq!(report.non_finite, 1);
        assert!(!report.is_terminal());
    }

    #[test]
    fn unresolved_source_edge_is_inert() {
        let mut store = GraphStore::new();
        store.add_edge("ghost", "B", 1.0).unwrap();
        store.add_edge("B", "out", 1.0).unwrap();
        store
            .add_container(ContainerSpec::new("B", 0.1, 300.0, 800.0, 0.0, 0.5))
            .unwrap();

        for _ in 0..5 {
            step_once(&mut store);
        }
        let ghost_edge = store.inbound_edges("B")[0];
        assert_eq!(ghost_edge.state.rate, 0.0);
        assert_eq!(store.find_container("B").unwrap().state.in_rate, 0.0);
    }

    #[test]
    fn terminal_condition_reported() {
        // A pure, fast feed drives the receiver's concentration past 1.
        let mut store = GraphStore::new();
        store.add_edge("Feed", "Tank", 1.0).unwrap();
        store.add_edge("Tank", "out", 1.0).unwrap();
        store
            .add_container(ContainerSpec::new("Feed", 10.0, 1000.0, 1000.0, 1.0, 0.5))
            .unwrap();
        store
            .add_container(ContainerSpec::new("Tank", 1.0, 1.0, 100.0, 0.0, 0.5))
            .unwrap();

        let report = step_once(&mut store);
        assert!(report.is_terminal());
        assert_eq!(report.terminal[0].name, "Tank");
        assert!(report.terminal[0].concentration > 1.0);
    }
}
