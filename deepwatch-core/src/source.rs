//! Source document loading
//!
//! Source documents are JSON or YAML files whose top level is an object.

use crate::error::{Result, WatchError};
use deepwatch_types::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Serialization format of a source document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(SourceFormat::Json),
            "yaml" | "yml" => Ok(SourceFormat::Yaml),
            _ => Err(WatchError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Parse source text into a top-level object
pub fn parse_source(text: &str, format: SourceFormat) -> Result<Map> {
    let value: Value = match format {
        SourceFormat::Json => serde_json::from_str(text)?,
        SourceFormat::Yaml => serde_yaml::from_str(text)?,
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(WatchError::InvalidArgument(format!(
            "source document must be an object, found {}",
            other.type_name()
        ))),
    }
}

/// Read and parse a source file
pub fn load_source(path: &Path) -> Result<Map> {
    let format = SourceFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| WatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let map = parse_source(&text, format)?;
    debug!(path = %path.display(), keys = map.len(), "loaded source");
    Ok(map)
}
