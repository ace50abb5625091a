//! Typed-reference pattern audit
//!
//! Mapping blocks should express relationships to other entities as typed
//! references, and keep flat display fields next to them. This audit is
//! advisory and read-only; it never moves plugins.

pub mod rules;

pub use rules::{expected_display_fields, expected_references, typed_reference_target, ExpectedReference};

use anyhow::Result;
use manifest_parser::{join_pointer, parse_frontmatter, Manifest};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// How much a pattern issue matters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A missing reference or display field in one mapping block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternIssue {
    pub severity: Severity,
    pub entity: String,

    /// JSON pointer of the mapping block
    pub path: String,

    pub message: String,
}

/// Audit result for one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginPatterns {
    pub path: String,

    /// Typed references found, as `field -> entity` per block path
    pub typed_references: BTreeMap<String, BTreeMap<String, String>>,

    pub issues: Vec<PatternIssue>,
}

/// Aggregate audit result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternReport {
    /// Number of plugins examined
    pub checked: usize,

    /// Plugins with a readable manifest, in path order
    pub plugins: Vec<PluginPatterns>,
}

impl PatternReport {
    pub fn errors(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warnings(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Plugins declaring at least one typed reference
    pub fn with_typed_references(&self) -> usize {
        self.plugins
            .iter()
            .filter(|p| !p.typed_references.is_empty())
            .count()
    }

    /// 1 on errors, 2 on warnings when `strict`, else 0
    pub fn exit_code(&self, strict: bool) -> u8 {
        if self.errors() > 0 {
            1
        } else if strict && self.warnings() > 0 {
            2
        } else {
            0
        }
    }

    fn count(&self, severity: Severity) -> usize {
        self.plugins
            .iter()
            .flat_map(|p| &p.issues)
            .filter(|i| i.severity == severity)
            .count()
    }
}

/// Audit every mapping block of a manifest
pub fn audit_manifest(path: impl Into<String>, manifest: &Manifest) -> PluginPatterns {
    let mut result = PluginPatterns {
        path: path.into(),
        typed_references: BTreeMap::new(),
        issues: Vec::new(),
    };

    for block in manifest.mapping_blocks() {
        let references: BTreeMap<String, String> = block
            .entries
            .iter()
            .filter_map(|(field, value)| {
                typed_reference_target(value).map(|target| (field.clone(), target.to_string()))
            })
            .collect();

        for expected in expected_references(block.entity) {
            if references.values().any(|target| target == expected.target) {
                continue;
            }

            result.issues.push(PatternIssue {
                severity: if expected.optional {
                    Severity::Warning
                } else {
                    Severity::Error
                },
                entity: block.entity.to_string(),
                path: block.path.clone(),
                message: format!(
                    "Missing typed reference: {} → {} ({})",
                    expected.field, expected.target, expected.reason
                ),
            });
        }

        for field in references.keys() {
            let missing: Vec<&str> = expected_display_fields(field)
                .iter()
                .copied()
                .filter(|key| !block.entries.contains_key(*key))
                .collect();

            if missing.is_empty() {
                continue;
            }

            result.issues.push(PatternIssue {
                severity: Severity::Warning,
                entity: block.entity.to_string(),
                path: join_pointer(&block.path, field),
                message: format!(
                    "Typed reference '{}' has no display fields: {}",
                    field,
                    missing.join(", ")
                ),
            });
        }

        if !references.is_empty() {
            result.typed_references.insert(block.path.clone(), references);
        }
    }

    result
}

/// Read a plugin descriptor and audit it. Unreadable descriptors are not
/// this audit's concern and yield `None`.
pub fn audit_descriptor(descriptor: &Path, display_path: &str) -> Result<Option<PluginPatterns>> {
    let content = fs::read_to_string(descriptor)?;

    let manifest = match parse_frontmatter(&content).and_then(Manifest::from_value) {
        Ok(manifest) => manifest,
        Err(e) => {
            debug!("Skipping pattern audit of {}: {}", display_path, e);
            return Ok(None);
        }
    };

    Ok(Some(audit_manifest(display_path, &manifest)))
}
