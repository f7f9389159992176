//! Loading schemas from JSON or YAML files.

use std::fs;
use std::path::Path;

use argline_core::{Schema, validate_schema};
use tracing::debug;

/// Schema file encodings, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// `.yaml` and `.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Reads and deserializes a schema file without validating it.
pub fn load_schema(path: &Path) -> Result<Schema, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let format = SchemaFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading schema");

    match format {
        SchemaFormat::Json => serde_json::from_str(&raw)
            .map_err(|err| format!("Invalid JSON schema '{}': {err}", path.display())),
        SchemaFormat::Yaml => serde_yaml::from_str(&raw)
            .map_err(|err| format!("Invalid YAML schema '{}': {err}", path.display())),
    }
}

/// Reads a schema file and rejects it if validation finds a problem.
pub fn load_and_validate_schema(path: &Path) -> Result<Schema, String> {
    let schema = load_schema(path)?;
    let errors = validate_schema(&schema);
    if let Some(err) = errors.first() {
        return Err(format!("Invalid schema '{}': {err}", path.display()));
    }
    Ok(schema)
}
