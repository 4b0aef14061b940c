//! Scenario file schema definitions.

use mf_core::Real;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioFile {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub containers: Vec<ContainerDef>,
    #[serde(default)]
    pub edges: Vec<EdgeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerDef {
    pub name: String,
    pub max_out_rate: Real,
    pub start_level: Real,
    pub max_capacity: Real,
    pub start_concentration: Real,
    #[serde(default = "default_lethal_concentration")]
    pub lethal_concentration: Real,
}

fn default_lethal_concentration() -> Real {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeDef {
    pub from: String,
    pub to: String,
    pub percent: Real,
}

/// Default run settings stored alongside a scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    pub ticks: u64,
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,
}

fn default_cadence_ms() -> u64 {
    16
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            ticks: 600,
            cadence_ms: default_cadence_ms(),
        }
    }
}
