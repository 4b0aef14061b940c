//! Scenario file validation.
//!
//! Checks what can be judged from the file alone. The container gate
//! (levels, capacities, output sums) runs when the scenario is built into a
//! graph store.

use std::collections::HashSet;

use mf_core::{MfError, ensure_finite, ensure_fraction};

use crate::schema::{ContainerDef, EdgeDef, ScenarioFile};

/// Newest scenario file version this crate reads and writes.
pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScenarioValidationError {
    #[error("Duplicate container name: {name}")]
    DuplicateName { name: String },

    #[error("Empty container name at position {position}")]
    EmptyName { position: usize },

    #[error("Invalid value in {context}: {source}")]
    InvalidValue {
        context: String,
        #[source]
        source: MfError,
    },

    #[error("Invalid run settings: {reason}")]
    InvalidRun { reason: &'static str },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(file: &ScenarioFile) -> Result<(), ScenarioValidationError> {
    if file.version == 0 || file.version > LATEST_VERSION {
        return Err(ScenarioValidationError::UnsupportedVersion {
            version: file.version,
        });
    }

    let mut names = HashSet::new();
    for (position, container) in file.containers.iter().enumerate() {
        if container.name.trim().is_empty() {
            return Err(ScenarioValidationError::EmptyName { position });
        }
        if !names.insert(container.name.as_str()) {
            return Err(ScenarioValidationError::DuplicateName {
                name: container.name.clone(),
            });
        }
        validate_container(container)?;
    }

    for edge in &file.edges {
        validate_edge(edge)?;
    }

    if let Some(run) = &file.run {
        if run.ticks == 0 {
            return Err(ScenarioValidationError::InvalidRun {
                reason: "ticks must be positive",
            });
        }
    }

    Ok(())
}

fn validate_container(container: &ContainerDef) -> Result<(), ScenarioValidationError> {
    let context = || format!("container '{}'", container.name);
    let wrap = |source: MfError| ScenarioValidationError::InvalidValue {
        context: context(),
        source,
    };

    ensure_finite(container.max_out_rate, "max_out_rate").map_err(wrap)?;
    ensure_finite(container.start_level, "start_level").map_err(wrap)?;
    ensure_finite(container.max_capacity, "max_capacity").map_err(wrap)?;
    ensure_finite(container.start_concentration, "start_concentration").map_err(wrap)?;
    ensure_finite(container.lethal_concentration, "lethal_concentration").map_err(wrap)?;
    Ok(())
}

fn validate_edge(edge: &EdgeDef) -> Result<(), ScenarioValidationError> {
    ensure_fraction(edge.percent, "percent").map_err(|source| {
        ScenarioValidationError::InvalidValue {
            context: format!("edge {} -> {}", edge.from, edge.to),
            source,
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::RunDef;

    fn container(name: &str) -> ContainerDef {
        ContainerDef {
            name: name.to_string(),
            max_out_rate: 0.5,
            start_level: 500.0,
            max_capacity: 500.0,
            start_concentration: 1.0,
            lethal_concentration: 0.5,
        }
    }

    fn file() -> ScenarioFile {
        ScenarioFile {
            version: LATEST_VERSION,
            name: "test".to_string(),
            containers: vec![container("A"), container("B")],
            edges: vec![EdgeDef {
                from: "A".to_string(),
                to: "B".to_string(),
                percent: 1.0,
            }],
            run: None,
        }
    }

    #[test]
    fn valid_file_passes() {
        validate_scenario(&file()).unwrap();
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut f = file();
        f.containers.push(container("A"));
        assert_eq!(
            validate_scenario(&f),
            Err(ScenarioValidationError::DuplicateName {
                name: "A".to_string()
            })
        );
    }

    #[test]
    fn percent_out_of_range_rejected() {
        let mut f = file();
        f.edges[0].percent = 1.5;
        let err = validate_scenario(&f).unwrap_err();
        assert!(matches!(err, ScenarioValidationError::InvalidValue { .. }));
        assert!(err.to_string().contains("edge A -> B"));
    }

    #[test]
    fn non_finite_level_rejected() {
        let mut f = file();
        f.containers[1].start_level = f64::INFINITY;
        assert!(matches!(
            validate_scenario(&f),
            Err(ScenarioValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn version_checked() {
        let mut f = file();
        f.version = LATEST_VERSION + 1;
        assert_eq!(
            validate_scenario(&f),
            Err(ScenarioValidationError::UnsupportedVersion { version: 2 })
        );
        f.version = 0;
        assert!(validate_scenario(&f).is_err());
    }

    #[test]
    fn zero_tick_run_rejected() {
        let mut f = file();
        f.run = Some(RunDef {
            ticks: 0,
            cadence_ms: 16,
        });
        assert!(matches!(
            validate_scenario(&f),
            Err(ScenarioValidationError::InvalidRun { .. })
        ));
    }

    #[test]
    fn gate_rules_are_not_checked_here() {
        // Level below max_out_rate is refused later by the graph gate.
        let mut f = file();
        f.containers[0].start_level = 0.1;
        validate_scenario(&f).unwrap();
    }
}
