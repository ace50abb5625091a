//! Plugin manifest parsing and schema validation
//!
//! A plugin descriptor is a markdown file opening with a YAML block between
//! two `---` lines. This crate extracts that block, checks it against the
//! plugin schema, and deserializes it into a typed [`Manifest`].

pub mod frontmatter;
pub mod model;
pub mod schema;

pub use frontmatter::{extract_frontmatter, parse_frontmatter, DELIMITER};
pub use model::{
    join_pointer, AdapterSpec, Manifest, MappingBlock, MappingValue, ToolKind, ToolSpec,
};
pub use schema::{SchemaValidator, SchemaViolation, BUNDLED_SCHEMA};

use std::path::PathBuf;

/// Manifest parsing and schema loading errors
#[derive(thiserror::Error, Debug)]
pub enum ManifestError {
    #[error("No frontmatter block delimited by '---' lines found")]
    MissingFrontmatter,

    #[error("Frontmatter is not valid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),

    #[error("Frontmatter does not match the manifest structure: {0}")]
    Structure(#[from] serde_json::Error),

    #[error("Schema file not found: {0}")]
    SchemaNotFound(PathBuf),

    #[error("Failed to read schema file {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Schema is not valid JSON: {0}")]
    SchemaJson(serde_json::Error),

    #[error("Schema failed to compile: {0}")]
    InvalidSchema(String),
}
