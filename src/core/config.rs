//! Circuit configuration - element records and simulation defaults loaded from YAML
//!
//! ```yaml
//! elements:
//!   - symbol: R1
//!     typical_value: 1000
//!     room_temperature_tolerance: 1        # ±1 %
//!     temperature_coefficient: 50          # ppm/°C
//!   - symbol: R2
//!     typical_value: 1000
//!     room_temperature_tolerance: [-1, 2]
//!     temperature_coefficient: 50
//!     max_temperature_tolerance: [-2, 3]
//!     max_operating_temperature: 125
//!     seed: 7
//! simulation:
//!   temperature: 85
//!   iterations: 20000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::entities::element::{ElementSpec, ROOM_TEMPERATURE};
use crate::yaml::{parse_yaml, parse_yaml_file};

/// Default Monte Carlo iteration count
pub const DEFAULT_ITERATIONS: u32 = 10_000;

fn default_temperature() -> f64 {
    ROOM_TEMPERATURE
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

/// Operating point and batch size for a Monte Carlo run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Ambient temperature for every draw (°C)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Number of Monte Carlo iterations
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            temperature: ROOM_TEMPERATURE,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SimulationConfig {
    pub fn at_temperature(temperature: f64) -> Self {
        Self {
            temperature,
            ..Default::default()
        }
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }
}

/// A circuit description: its elements plus default simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitConfig {
    /// Element records in declaration order
    pub elements: Vec<ElementSpec>,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl CircuitConfig {
    /// Parse a circuit description from YAML text
    pub fn from_yaml(content: &str, filename: &str) -> Result<Self> {
        Ok(parse_yaml(content, filename)?)
    }

    /// Load a circuit description from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let config: CircuitConfig = parse_yaml_file(path)?;
        tracing::debug!(
            path = %path.display(),
            elements = config.elements.len(),
            "loaded circuit configuration"
        );
        Ok(config)
    }

    /// Symbols in declaration order
    pub fn symbols(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.symbol.as_str()).collect()
    }
}
