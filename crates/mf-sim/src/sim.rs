//! Run loop and result recording.

use mf_graph::{ContainerState, EdgeState, GraphStore};
use tracing::{info, warn};

use crate::engine::step_once;
use crate::error::{SimError, SimResult};
use crate::events::StopReason;
use crate::observer::TickObserver;

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Maximum number of ticks to run
    pub max_ticks: u64,
    /// Record every N-th tick (decimation)
    pub record_every: u64,
    /// Stop as soon as any concentration exceeds 1
    pub stop_on_terminal: bool,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            max_ticks: 600,
            record_every: 60,
            stop_on_terminal: true,
        }
    }
}

impl SimOptions {
    pub fn validate(&self) -> SimResult<()> {
        if self.max_ticks == 0 {
            return Err(SimError::InvalidArg {
                what: "max_ticks must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        Ok(())
    }
}

/// State of one container at a recorded tick.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerSample {
    pub name: String,
    pub state: ContainerState,
}

/// State of one edge at a recorded tick.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeSample {
    pub source: String,
    pub destination: String,
    pub state: EdgeState,
}

/// All container and edge states at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkSnapshot {
    pub containers: Vec<ContainerSample>,
    pub edges: Vec<EdgeSample>,
}

impl NetworkSnapshot {
    pub fn capture(store: &GraphStore) -> Self {
        Self {
            containers: store
                .containers()
                .iter()
                .map(|c| ContainerSample {
                    name: c.name().to_string(),
                    state: c.state,
                })
                .collect(),
            edges: store
                .edges()
                .iter()
                .map(|e| EdgeSample {
                    source: e.source().to_string(),
                    destination: e.destination().to_string(),
                    state: e.state,
                })
                .collect(),
        }
    }

    pub fn container(&self, name: &str) -> Option<&ContainerSample> {
        self.containers.iter().find(|c| c.name == name)
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord {
    /// Tick numbers of the snapshots (0 is the state before the first tick)
    pub ticks: Vec<u64>,
    /// Network snapshots
    pub snapshots: Vec<NetworkSnapshot>,
    /// Ticks actually executed
    pub ticks_run: u64,
    pub stop: StopReason,
}

impl SimRecord {
    /// The last recorded snapshot, which is always the final state.
    pub fn last(&self) -> Option<&NetworkSnapshot> {
        self.snapshots.last()
    }
}

/// Run the network for up to `opts.max_ticks` ticks.
///
/// The observer is called after every tick. The loop stops early when the
/// observer breaks, or on the terminal condition if `stop_on_terminal` is set.
pub fn run_sim<O: TickObserver + ?Sized>(
    store: &mut GraphStore,
    opts: &SimOptions,
    observer: &mut O,
) -> SimResult<SimRecord> {
    opts.validate()?;

    info!(
        max_ticks = opts.max_ticks,
        containers = store.containers().len(),
        edges = store.edges().len(),
        "run started"
    );

    let mut ticks = vec![0];
    let mut snapshots = vec![NetworkSnapshot::capture(store)];
    let mut stop = StopReason::TickLimit;

    let mut tick = 0;
    while tick < opts.max_ticks {
        let report = step_once(store);
        tick += 1;

        // Record if decimation matches
        if tick % opts.record_every == 0 {
            ticks.push(tick);
            snapshots.push(NetworkSnapshot::capture(store));
        }

        let flow = observer.on_tick_completed(tick, &report, store);

        if opts.stop_on_terminal && report.is_terminal() {
            for t in &report.terminal {
                warn!(
                    tick,
                    container = %t.name,
                    concentration = t.concentration,
                    "terminal concentration reached"
                );
            }
            stop = StopReason::Terminal(report.terminal);
            break;
        }
        if flow.is_break() {
            stop = StopReason::Requested;
            break;
        }
    }

    // Always record final state
    if tick % opts.record_every != 0 {
        ticks.push(tick);
        snapshots.push(NetworkSnapshot::capture(store));
    }

    info!(ticks_run = tick, stop = ?stop, "run stopped");
    Ok(SimRecord {
        ticks,
        snapshots,
        ticks_run: tick,
        stop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;

    use crate::observer::NoopObserver;
    use crate::scenario::{EdgeSpec, Scenario, load_scenario};
    use mf_graph::ContainerSpec;

    fn two_tanks() -> GraphStore {
        let scenario = Scenario {
            name: "two tanks".into(),
            containers: vec![
                ContainerSpec::new("A", 0.5, 500.0, 500.0, 1.0, 0.5),
                ContainerSpec::new("B", 0.1, 300.0, 800.0, 0.0, 0.5),
            ],
            edges: vec![EdgeSpec::new("A", "B", 1.0), EdgeSpec::new("B", "out", 1.0)],
        };
        let mut store = GraphStore::new();
        load_scenario(&mut store, &scenario).unwrap();
        store
    }

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.max_ticks, 600);
        assert_eq!(opts.record_every, 60);
        assert!(opts.stop_on_terminal);
    }

    #[test]
    fn sim_options_invalid() {
        let mut store = two_tanks();
        let opts = SimOptions {
            max_ticks: 0,
            ..SimOptions::default()
        };
        assert!(matches!(
            run_sim(&mut store, &opts, &mut NoopObserver),
            Err(SimError::InvalidArg { .. })
        ));

        let opts = SimOptions {
            record_every: 0,
            ..SimOptions::default()
        };
        assert!(run_sim(&mut store, &opts, &mut NoopObserver).is_err());
    }

    #[test]
    fn records_with_decimation_and_final_state() {
        let mut store = two_tanks();
        let opts = SimOptions {
            max_ticks: 25,
            record_every: 10,
            stop_on_terminal: true,
        };
        let record = run_sim(&mut store, &opts, &mut NoopObserver).unwrap();
        assert_eq!(record.ticks, vec![0, 10, 20, 25]);
        assert_eq!(record.snapshots.len(), 4);
        assert_eq!(record.ticks_run, 25);
        assert_eq!(record.stop, StopReason::TickLimit);

        let a = record.last().unwrap().container("A").unwrap();
        assert!((a.state.liquid_level - 487.5).abs() < 1e-9);
    }

    #[test]
    fn observer_can_stop_the_run() {
        let mut store = two_tanks();
        let mut seen = Vec::new();
        let mut observer = |tick: u64, _: &crate::StepReport, _: &GraphStore| {
            seen.push(tick);
            if tick == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };
        let record = run_sim(&mut store, &SimOptions::default(), &mut observer).unwrap();
        assert_eq!(record.stop, StopReason::Requested);
        assert_eq!(record.ticks_run, 3);
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn terminal_concentration_stops_the_run() {
        let scenario = Scenario {
            name: "overdose".into(),
            containers: vec![
                ContainerSpec::new("Feed", 10.0, 1000.0, 1000.0, 1.0, 0.5),
                ContainerSpec::new("Tank", 1.0, 1.0, 100.0, 0.0, 0.5),
            ],
            edges: vec![
                EdgeSpec::new("Feed", "Tank", 1.0),
                EdgeSpec::new("Tank", "out", 1.0),
            ],
        };
        let mut store = GraphStore::new();
        load_scenario(&mut store, &scenario).unwrap();

        let record = run_sim(&mut store, &SimOptions::default(), &mut NoopObserver).unwrap();
        assert_eq!(record.ticks_run, 1);
        match &record.stop {
            StopReason::Terminal(hit) => assert_eq!(hit[0].name, "Tank"),
            other => panic!("unexpected stop: {other:?}"),
        }

        let opts = SimOptions {
            max_ticks: 5,
            stop_on_terminal: false,
            ..SimOptions::default()
        };
        let record = run_sim(&mut store, &opts, &mut NoopObserver).unwrap();
        assert_eq!(record.ticks_run, 5);
    }
}
