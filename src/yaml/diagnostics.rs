//! YAML error diagnostics with source locations

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error("failed to read circuit file {path}: {source}")]
    #[diagnostic(code(ctol::yaml::io))]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),
}

/// A YAML document that failed to parse or did not match the expected shape
#[derive(Debug, Error, Diagnostic)]
#[error("invalid YAML in {filename}: {message}")]
#[diagnostic(code(ctol::yaml::syntax))]
pub struct YamlSyntaxError {
    filename: String,
    message: String,
    line: Option<usize>,

    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let location = err.location();
        let span = location.as_ref().map(|loc| {
            let offset = loc.index().min(content.len());
            let len = usize::from(offset < content.len());
            SourceSpan::from((offset, len))
        });

        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            line: location.as_ref().map(|loc| loc.line()),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }

    /// A document with nothing to deserialize
    pub fn empty(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            message: "document is empty".to_string(),
            line: None,
            src: NamedSource::new(filename, String::new()),
            span: None,
        }
    }

    /// 1-based line of the failure, when the parser reported one
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
