//! Calculator - Monte Carlo aggregation over a set of circuit elements
//!
//! The calculator owns every [`Element`] of a circuit, keyed by symbol. A run draws a
//! fresh value for each referenced element per iteration, feeds the values to the
//! caller's [`TransferFunction`], and reduces the outputs to statistics measured
//! against one noise-free nominal evaluation.
//!
//! A run either completes with every iteration evaluated or aborts on the first
//! failure; partial populations are never summarized.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::config::{CircuitConfig, SimulationConfig};
use crate::core::error::{Result, ToleranceError};
use crate::core::stats::{percent_deviation, Summary};
use crate::core::transfer::{FormulaError, InputParams, TransferFunction, ValueMap};
use crate::entities::element::{Element, ElementSpec};

/// Terminal state of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationStatus {
    /// Every iteration evaluated; statistics populated
    Completed,
    /// Stopped on a failure; only the error is meaningful
    Aborted,
}

impl std::fmt::Display for SimulationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationStatus::Completed => write!(f, "completed"),
            SimulationStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Percent deviations of the simulated statistics from the nominal output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentErrors {
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Monte Carlo simulation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Output with every element at its typical value
    pub nominal_output: f64,

    /// Mean output
    pub average_output: f64,

    /// Minimum output seen
    pub min_output: f64,

    /// Maximum output seen
    pub max_output: f64,

    /// Population standard deviation of the outputs
    pub std_dev_output: f64,

    /// Lower percentile (2.5%)
    pub percentile_2_5: f64,

    /// Upper percentile (97.5%)
    pub percentile_97_5: f64,

    /// Mean deviation from nominal, in percent; `None` when nominal is zero
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_error_average: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_error_min: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_error_max: Option<f64>,

    /// Set when the run completed but the nominal output is zero, so the percent
    /// error fields are absent
    #[serde(default)]
    pub percent_error_undefined: bool,

    /// Iterations actually completed (0 when aborted)
    pub num_simulations: u32,

    /// Failure description; present only when the run aborted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResult {
    fn completed(nominal_output: f64, summary: &Summary) -> Self {
        Self {
            nominal_output,
            average_output: summary.mean,
            min_output: summary.min,
            max_output: summary.max,
            std_dev_output: summary.std_dev,
            percentile_2_5: summary.percentile_2_5,
            percentile_97_5: summary.percentile_97_5,
            percent_error_average: percent_deviation(summary.mean, nominal_output),
            percent_error_min: percent_deviation(summary.min, nominal_output),
            percent_error_max: percent_deviation(summary.max, nominal_output),
            percent_error_undefined: nominal_output == 0.0,
            num_simulations: summary.count as u32,
            error: None,
        }
    }

    fn aborted(error: &ToleranceError) -> Self {
        Self {
            nominal_output: 0.0,
            average_output: 0.0,
            min_output: 0.0,
            max_output: 0.0,
            std_dev_output: 0.0,
            percentile_2_5: 0.0,
            percentile_97_5: 0.0,
            percent_error_average: None,
            percent_error_min: None,
            percent_error_max: None,
            percent_error_undefined: false,
            num_simulations: 0,
            error: Some(error.to_string()),
        }
    }

    pub fn status(&self) -> SimulationStatus {
        if self.error.is_some() {
            SimulationStatus::Aborted
        } else {
            SimulationStatus::Completed
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status() == SimulationStatus::Completed
    }

    /// Percent errors of the completed run
    ///
    /// Fails with [`ToleranceError::UndefinedPercentError`] when the nominal output is
    /// zero, and with [`ToleranceError::SimulationAborted`] for an aborted run.
    pub fn percent_errors(&self) -> Result<PercentErrors> {
        if let Some(error) = &self.error {
            return Err(ToleranceError::SimulationAborted(error.clone()));
        }
        if self.percent_error_undefined {
            return Err(ToleranceError::UndefinedPercentError);
        }
        match (
            self.percent_error_average,
            self.percent_error_min,
            self.percent_error_max,
        ) {
            (Some(average), Some(min), Some(max)) => Ok(PercentErrors { average, min, max }),
            _ => Err(ToleranceError::UndefinedPercentError),
        }
    }
}

/// Relative sensitivity of the output to one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    pub symbol: String,

    /// (ΔOut / Out) / (ΔValue / Value) around the nominal point
    pub sensitivity: f64,
}

/// Owns a circuit's elements and runs evaluations over them
///
/// Not `Clone`: a copy would replay the same random streams as the original.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<ctol::core::Calculator>();
/// ```
#[derive(Debug, Default)]
pub struct Calculator {
    elements: HashMap<String, Element>,
}

impl Calculator {
    /// Build every element from its record; fails on the first invalid or duplicate one
    pub fn new<I>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = ElementSpec>,
    {
        let mut elements = HashMap::new();

        for spec in specs {
            if elements.contains_key(&spec.symbol) {
                return Err(ToleranceError::invalid(&spec.symbol, "duplicate symbol"));
            }
            let element = Element::new(spec)?;
            elements.insert(element.symbol().to_string(), element);
        }

        tracing::debug!(elements = elements.len(), "calculator ready");
        Ok(Self { elements })
    }

    pub fn from_config(config: &CircuitConfig) -> Result<Self> {
        Self::new(config.elements.iter().cloned())
    }

    /// Look up an element by exact symbol
    pub fn get(&self, symbol: &str) -> Option<&Element> {
        self.elements.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.elements.contains_key(symbol)
    }

    /// Registered symbols, sorted
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.elements.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn require(&self, symbol: &str) -> Result<&Element> {
        self.elements
            .get(symbol)
            .ok_or_else(|| ToleranceError::UnknownSymbol(symbol.to_string()))
    }

    fn require_mut(&mut self, symbol: &str) -> Result<&mut Element> {
        self.elements
            .get_mut(symbol)
            .ok_or_else(|| ToleranceError::UnknownSymbol(symbol.to_string()))
    }

    /// Draw one varied value of `symbol` at `temperature`
    pub fn actual_value(&mut self, symbol: &str, temperature: f64) -> Result<f64> {
        check_temperature(temperature)?;
        Ok(self.require_mut(symbol)?.actual_value(temperature))
    }

    /// Typical values of `symbols`, with no error applied
    pub fn nominal_values<S: AsRef<str>>(&self, symbols: &[S]) -> Result<ValueMap> {
        let mut values = ValueMap::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            values.insert(symbol, self.require(symbol)?.typical_value());
        }
        Ok(values)
    }

    /// Evaluate the transfer function once at typical values
    ///
    /// This is the reference point for percent errors. Temperature plays no part.
    pub fn nominal_evaluate<F, S>(
        &self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
    ) -> Result<f64>
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        let values = self.nominal_values(symbols)?;
        invoke(transfer, &values, params)
    }

    /// Evaluate the transfer function once with a fresh draw for every element
    pub fn sample_evaluate<F, S>(
        &mut self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        temperature: f64,
    ) -> Result<f64>
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        let mut values = ValueMap::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            values.insert(symbol, self.actual_value(symbol, temperature)?);
        }
        invoke(transfer, &values, params)
    }

    /// Run a Monte Carlo simulation and summarize the outputs
    pub fn run_simulation<F, S>(
        &mut self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        temperature: f64,
        iterations: u32,
    ) -> SimulationResult
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        let (result, _samples) =
            self.run_simulation_with_samples(transfer, symbols, params, temperature, iterations);
        result
    }

    /// Run with the temperature and iteration count from `config`
    pub fn run_configured<F, S>(
        &mut self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        config: &SimulationConfig,
    ) -> SimulationResult
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        self.run_simulation(
            transfer,
            symbols,
            params,
            config.temperature,
            config.iterations,
        )
    }

    /// Run a Monte Carlo simulation and return both results and raw samples
    ///
    /// Samples are in draw order. An aborted run returns no samples.
    pub fn run_simulation_with_samples<F, S>(
        &mut self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        temperature: f64,
        iterations: u32,
    ) -> (SimulationResult, Vec<f64>)
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        tracing::debug!(iterations, temperature, "starting Monte Carlo run");

        let (nominal, samples) =
            match self.simulate(transfer, symbols, params, temperature, iterations) {
                Ok(run) => run,
                Err(e) => {
                    tracing::warn!(error = %e, "Monte Carlo run aborted");
                    return (SimulationResult::aborted(&e), Vec::new());
                }
            };

        let Some(summary) = Summary::from_samples(&samples) else {
            let e = ToleranceError::InvalidArgument("no samples were produced".to_string());
            return (SimulationResult::aborted(&e), Vec::new());
        };

        let result = SimulationResult::completed(nominal, &summary);
        if result.percent_error_undefined {
            tracing::warn!("nominal output is zero; percent errors are undefined");
        }
        tracing::debug!(
            mean = result.average_output,
            std_dev = result.std_dev_output,
            "Monte Carlo run completed"
        );

        (result, samples)
    }

    fn simulate<F, S>(
        &mut self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        temperature: f64,
        iterations: u32,
    ) -> Result<(f64, Vec<f64>)>
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        if iterations == 0 {
            return Err(ToleranceError::InvalidArgument(
                "iterations must be at least 1".to_string(),
            ));
        }
        check_temperature(temperature)?;

        let nominal = self.nominal_evaluate(transfer, symbols, params)?;

        let mut samples = Vec::with_capacity(iterations as usize);
        for iteration in 0..iterations {
            let output = self
                .sample_evaluate(transfer, symbols, params, temperature)
                .inspect_err(|_| tracing::debug!(iteration, "transfer function failed"))?;
            samples.push(output);
        }

        Ok((nominal, samples))
    }

    /// Local sensitivity of the output to each element
    ///
    /// Each element's typical value is moved by ±`delta_percent` while the others stay
    /// nominal; the result is the central-difference relative sensitivity
    /// `((out₊ − out₋) / out₀) / (2 × delta / 100)`.
    pub fn local_sensitivity<F, S>(
        &self,
        transfer: &F,
        symbols: &[S],
        params: &InputParams,
        delta_percent: f64,
    ) -> Result<Vec<Sensitivity>>
    where
        F: TransferFunction + ?Sized,
        S: AsRef<str>,
    {
        if !(delta_percent.is_finite() && delta_percent > 0.0) {
            return Err(ToleranceError::InvalidArgument(format!(
                "sensitivity delta must be positive, got {}",
                delta_percent
            )));
        }

        let nominal = self.nominal_values(symbols)?;
        let base_output = invoke(transfer, &nominal, params)?;

        let mut results = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            let typical = self.require(symbol)?.typical_value();

            if base_output == 0.0 || typical == 0.0 {
                return Err(ToleranceError::UndefinedSensitivity(symbol.to_string()));
            }

            let mut perturbed = nominal.clone();
            perturbed.insert(symbol, typical * (1.0 + delta_percent / 100.0));
            let output_plus = invoke(transfer, &perturbed, params)?;

            perturbed.insert(symbol, typical * (1.0 - delta_percent / 100.0));
            let output_minus = invoke(transfer, &perturbed, params)?;

            let sensitivity =
                ((output_plus - output_minus) / base_output) / (2.0 * delta_percent / 100.0);

            results.push(Sensitivity {
                symbol: symbol.to_string(),
                sensitivity,
            });
        }

        Ok(results)
    }
}

fn check_temperature(temperature: f64) -> Result<()> {
    if temperature.is_finite() {
        Ok(())
    } else {
        Err(ToleranceError::InvalidArgument(format!(
            "temperature {} is not finite",
            temperature
        )))
    }
}

/// Call the transfer function, treating a non-finite output as a formula failure
fn invoke<F>(transfer: &F, values: &ValueMap, params: &InputParams) -> Result<f64>
where
    F: TransferFunction + ?Sized,
{
    let output = transfer.evaluate(values, params)?;
    if output.is_finite() {
        Ok(output)
    } else {
        Err(FormulaError::new(format!("transfer function returned {}", output)).into())
    }
}
