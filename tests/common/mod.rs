//! Shared test helpers for integration tests
//!
//! This module provides the reference circuits used across test files.

#![allow(dead_code)]

use ctol::core::{Calculator, FormulaError, InputParams, ValueMap};
use ctol::entities::ElementSpec;

pub const DIVIDER_SYMBOLS: [&str; 3] = ["R1", "R2", "Vin"];

/// R1 = R2 = 1 kΩ ±1 % 50 ppm/°C, Vin = 5 V ±0.1 % 10 ppm/°C
pub fn divider_specs(seed: u64) -> Vec<ElementSpec> {
    vec![
        ElementSpec::new("R1", 1000.0, 1.0, 50.0).with_seed(seed),
        ElementSpec::new("R2", 1000.0, 1.0, 50.0).with_seed(seed + 1),
        ElementSpec::new("Vin", 5.0, 0.1, 10.0).with_seed(seed + 2),
    ]
}

pub fn divider_calculator(seed: u64) -> Calculator {
    Calculator::new(divider_specs(seed)).unwrap()
}

/// Vout = Vin × R2 / (R1 + R2)
pub fn voltage_divider(values: &ValueMap, _params: &InputParams) -> Result<f64, FormulaError> {
    let r1 = values.require("R1")?;
    let r2 = values.require("R2")?;
    let v_in = values.require("Vin")?;
    if r1 + r2 == 0.0 {
        return Err(FormulaError::division_by_zero("R1 + R2"));
    }
    Ok(v_in * (r2 / (r1 + r2)))
}

/// Non-inverting amplifier gain × input: Vout = Vin × (1 + Rf / Rg)
pub fn non_inverting_amp(values: &ValueMap, params: &InputParams) -> Result<f64, FormulaError> {
    let rf = values.require("Rf")?;
    let rg = values.require("Rg")?;
    if rg == 0.0 {
        return Err(FormulaError::division_by_zero("Rg"));
    }
    Ok(params.require("vin")? * (1.0 + rf / rg))
}

/// Write a circuit YAML file into a temp dir and return both
pub fn write_circuit(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("circuit.yaml");
    std::fs::write(&path, content).unwrap();
    (tmp, path)
}
