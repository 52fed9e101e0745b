//! CTOL: Circuit tolerance spread analysis
//!
//! Models each circuit element's manufacturing tolerance and temperature drift, then
//! estimates the spread of a circuit's output by Monte Carlo sampling a caller-supplied
//! transfer function.
//!
//! ```no_run
//! use ctol::core::{Calculator, FormulaError, InputParams, ValueMap};
//! use ctol::entities::ElementSpec;
//!
//! let mut calc = Calculator::new([
//!     ElementSpec::new("R1", 1000.0, 1.0, 50.0),
//!     ElementSpec::new("R2", 1000.0, 1.0, 50.0),
//!     ElementSpec::new("Vin", 5.0, 0.1, 10.0),
//! ])?;
//!
//! let divider = |v: &ValueMap, _: &InputParams| -> Result<f64, FormulaError> {
//!     let (r1, r2) = (v.require("R1")?, v.require("R2")?);
//!     if r1 + r2 == 0.0 {
//!         return Err(FormulaError::division_by_zero("R1 + R2"));
//!     }
//!     Ok(v.require("Vin")? * r2 / (r1 + r2))
//! };
//!
//! let result = calc.run_simulation(&divider, &["R1", "R2", "Vin"], &InputParams::new(), 85.0, 10_000);
//! println!("{} ± {}", result.average_output, result.std_dev_output);
//! # Ok::<(), ctol::core::ToleranceError>(())
//! ```

pub mod core;
pub mod entities;
pub mod yaml;
