//! Built-in demo scenario.

use crate::schema::{ContainerDef, EdgeDef, RunDef, ScenarioFile};
use crate::validate::LATEST_VERSION;

/// Three tanks in a cascade: a pure reservoir feeding a mixer, which splits
/// into a holding tank and a drain.
pub fn demo_scenario() -> ScenarioFile {
    ScenarioFile {
        version: LATEST_VERSION,
        name: "Demo cascade".to_string(),
        containers: vec![
            container("Reservoir", 0.5, 500.0, 500.0, 1.0, 0.5),
            container("Mixer", 0.4, 300.0, 800.0, 0.0, 0.3),
            container("Holding", 0.2, 200.0, 600.0, 0.0, 0.2),
        ],
        edges: vec![
            edge("Reservoir", "Mixer", 1.0),
            edge("Mixer", "Holding", 0.75),
            edge("Mixer", "out", 0.25),
            edge("Holding", "out", 1.0),
        ],
        run: Some(RunDef::default()),
    }
}

fn container(
    name: &str,
    max_out_rate: f64,
    start_level: f64,
    max_capacity: f64,
    start_concentration: f64,
    lethal_concentration: f64,
) -> ContainerDef {
    ContainerDef {
        name: name.to_string(),
        max_out_rate,
        start_level,
        max_capacity,
        start_concentration,
        lethal_concentration,
    }
}

fn edge(from: &str, to: &str, percent: f64) -> EdgeDef {
    EdgeDef {
        from: from.to_string(),
        to: to.to_string(),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_scenario;

    #[test]
    fn demo_is_valid() {
        let demo = demo_scenario();
        validate_scenario(&demo).unwrap();
        assert_eq!(demo.containers.len(), 3);
        assert_eq!(demo.run.as_ref().map(|r| r.ticks), Some(600));
    }
}
