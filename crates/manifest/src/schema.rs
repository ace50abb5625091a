//! Plugin schema validation

use crate::ManifestError;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Schema shipped with the binary, used when no schema path is configured
pub const BUNDLED_SCHEMA: &str = include_str!("../schema/plugin.schema.json");

const TOOL_SECTIONS: [&str; 3] = ["operations", "utilities", "actions"];

/// One violated schema constraint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer of the offending value, `/` for the document root
    pub path: String,

    pub message: String,
}

/// Plugin schema, compiled once and reused for every manifest
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile the bundled schema
    pub fn bundled() -> Result<Self, ManifestError> {
        Self::compile(BUNDLED_SCHEMA)
    }

    /// Load and compile a schema file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::SchemaNotFound(path.to_path_buf()));
        }

        debug!("Loading plugin schema from {:?}", path);
        let source = std::fs::read_to_string(path).map_err(|source| ManifestError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::compile(&source)
    }

    /// Compile a schema from its JSON source
    pub fn compile(source: &str) -> Result<Self, ManifestError> {
        let schema: Value = serde_json::from_str(source).map_err(ManifestError::SchemaJson)?;
        let validator = jsonschema::validator_for(&schema)
            .map_err(|e| ManifestError::InvalidSchema(e.to_string()))?;

        Ok(Self { validator })
    }

    /// Collect every violated constraint. Nothing short-circuits: one
    /// entry per violation, sorted by path.
    pub fn validate(&self, instance: &Value) -> Vec<SchemaViolation> {
        let mut violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(instance)
            .map(|error| SchemaViolation {
                path: display_path(&error.instance_path.to_string()),
                message: error.to_string(),
            })
            .collect();

        if instance.is_object() && !declares_any_tool(instance) {
            violations.push(SchemaViolation {
                path: "/".to_string(),
                message: format!(
                    "must declare at least one entry in one of: {}",
                    TOOL_SECTIONS.join(", ")
                ),
            });
        }

        violations.sort();
        violations.dedup();
        violations
    }
}

fn declares_any_tool(instance: &Value) -> bool {
    TOOL_SECTIONS.iter().any(|section| {
        instance
            .get(section)
            .and_then(Value::as_object)
            .map(|tools| !tools.is_empty())
            .unwrap_or(false)
    })
}

fn display_path(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
