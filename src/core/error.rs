//! Error types for element construction and circuit evaluation

use miette::Diagnostic;
use thiserror::Error;

use crate::core::transfer::FormulaError;
use crate::yaml::YamlError;

#[derive(Debug, Error, Diagnostic)]
pub enum ToleranceError {
    #[error("invalid configuration for element '{symbol}': {reason}")]
    #[diagnostic(code(ctol::invalid_configuration))]
    InvalidConfiguration { symbol: String, reason: String },

    #[error("invalid argument: {0}")]
    #[diagnostic(code(ctol::invalid_argument))]
    InvalidArgument(String),

    #[error("unknown element symbol '{0}'")]
    #[diagnostic(
        code(ctol::unknown_symbol),
        help("register the element in the circuit before referencing it")
    )]
    UnknownSymbol(String),

    #[error("transfer function failed: {0}")]
    #[diagnostic(code(ctol::formula_evaluation))]
    FormulaEvaluation(#[from] FormulaError),

    #[error("percent error is undefined because the nominal output is zero")]
    #[diagnostic(
        code(ctol::undefined_percent_error),
        help("use the absolute statistics, or shift the transfer function away from zero")
    )]
    UndefinedPercentError,

    #[error("simulation aborted: {0}")]
    #[diagnostic(code(ctol::simulation_aborted))]
    SimulationAborted(String),

    #[error("sensitivity to '{0}' is undefined because the nominal output or its typical value is zero")]
    #[diagnostic(code(ctol::undefined_sensitivity))]
    UndefinedSensitivity(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),
}

impl ToleranceError {
    pub(crate) fn invalid(symbol: &str, reason: impl Into<String>) -> Self {
        ToleranceError::InvalidConfiguration {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToleranceError>;
