//! Transfer function contract - how a circuit maps element values to one output

use std::collections::HashMap;

use miette::Diagnostic;
use thiserror::Error;

/// Failure signalled by a transfer function (e.g., a degenerate denominator)
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(ctol::formula))]
pub struct FormulaError {
    message: String,
}

impl FormulaError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Convenience for the most common failure in circuit formulas
    pub fn division_by_zero(what: &str) -> Self {
        Self::new(format!("{} is zero", what))
    }

    /// A symbol or parameter the formula expected was not supplied
    pub fn missing(name: &str) -> Self {
        Self::new(format!("missing value '{}'", name))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Named scalar values handed to a transfer function
///
/// Used both for element values (keyed by symbol) and for the caller's extra
/// input parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    values: HashMap<String, f64>,
}

/// Extra, non-varying inputs passed through to the transfer function
pub type InputParams = ValueMap;

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Get a value or fail the formula with a descriptive error
    pub fn require(&self, name: &str) -> Result<f64, FormulaError> {
        self.get(name).ok_or_else(|| FormulaError::missing(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for ValueMap {
    fn from(pairs: [(K, f64); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A circuit transfer function: element values + input parameters → one scalar
///
/// Implementations must be pure: the engine calls `evaluate` once for the nominal
/// reference and once per Monte Carlo iteration, and assumes the same inputs always
/// give the same result. Closures of the matching shape implement this trait.
pub trait TransferFunction {
    fn evaluate(&self, values: &ValueMap, params: &InputParams) -> Result<f64, FormulaError>;
}

impl<F> TransferFunction for F
where
    F: Fn(&ValueMap, &InputParams) -> Result<f64, FormulaError>,
{
    fn evaluate(&self, values: &ValueMap, params: &InputParams) -> Result<f64, FormulaError> {
        self(values, params)
    }
}
