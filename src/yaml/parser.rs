//! Typed YAML deserialization for circuit records

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::yaml::diagnostics::{YamlError, YamlSyntaxError};

/// Deserialize `content`, labelling failures with `source_name`
///
/// An empty or comment-only document is reported as a syntax error rather than
/// deserializing as null.
pub fn parse_yaml<T: DeserializeOwned>(content: &str, source_name: &str) -> Result<T, YamlError> {
    let has_content = content
        .lines()
        .map(str::trim)
        .any(|l| !l.is_empty() && !l.starts_with('#') && l != "---");
    if !has_content {
        return Err(YamlSyntaxError::empty(source_name).into());
    }

    serde_yml::from_str(content)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, content, source_name).into())
}

/// Read and deserialize a circuit file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let content = std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "read circuit file");
    parse_yaml(&content, &path.display().to_string())
}
