//! Circuit YAML loading
//!
//! Deserialization goes through [`parse_yaml`]; failures become miette diagnostics
//! that point into the offending document.

pub mod diagnostics;
pub mod parser;

pub use diagnostics::{YamlError, YamlSyntaxError};
pub use parser::{parse_yaml, parse_yaml_file};
