//! Core module - evaluation engine, statistics, configuration and errors

pub mod calculator;
pub mod config;
pub mod error;
pub mod stats;
pub mod transfer;

pub use calculator::{Calculator, PercentErrors, Sensitivity, SimulationResult, SimulationStatus};
pub use config::{CircuitConfig, SimulationConfig, DEFAULT_ITERATIONS};
pub use error::{Result, ToleranceError};
pub use stats::Summary;
pub use transfer::{FormulaError, InputParams, TransferFunction, ValueMap};
