//! Per-plugin validation pipeline
//!
//! Checks run in a fixed order: descriptor parse, schema, return
//! references and mapping keys (only when the schema holds), expression
//! lint, icon, then test coverage. Every check runs to completion and
//! accumulates findings; nothing short-circuits except a descriptor that
//! cannot be read at all.

pub mod coverage;
pub mod mappings;
pub mod references;
pub mod result;

#[cfg(test)]
mod tests;

pub use coverage::{check_coverage, TestCoverageIndex};
pub use mappings::check_mappings;
pub use references::{check_returns, ReferenceCheck};
pub use result::{Finding, FindingCategory, PluginReport, QuarantineOutcome, RunReport};

use anyhow::Result;
use glob::Pattern;
use manifest_expr::lint_mapping;
use manifest_parser::{parse_frontmatter, Manifest, SchemaValidator};
use manifest_registry::Registry;
use std::fs;
use tracing::debug;

use crate::config::PluginsConfig;
use crate::discovery::PluginRef;

/// Which optional checks a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Return references and mapping keys
    pub references: bool,

    /// Test coverage
    pub coverage: bool,

    /// Icon presence
    pub icon: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self::full()
    }
}

impl CheckOptions {
    pub fn full() -> Self {
        Self {
            references: true,
            coverage: true,
            icon: true,
        }
    }

    /// Parse, schema, references, mappings and lint only
    pub fn pre_commit() -> Self {
        Self {
            references: true,
            coverage: false,
            icon: false,
        }
    }
}

/// Runs the check pipeline for single plugins against shared, read-only
/// schema and registry
pub struct PluginValidator<'a> {
    schema: &'a SchemaValidator,
    registry: &'a Registry,
    plugins: &'a PluginsConfig,
    test_patterns: Vec<Pattern>,
}

impl<'a> PluginValidator<'a> {
    pub fn new(
        schema: &'a SchemaValidator,
        registry: &'a Registry,
        plugins: &'a PluginsConfig,
    ) -> Result<Self> {
        Ok(Self {
            schema,
            registry,
            plugins,
            test_patterns: plugins.compile_test_patterns()?,
        })
    }

    /// Validate one plugin directory. `display_path` names it in reports.
    pub fn validate(&self, plugin: &PluginRef, display_path: &str, options: CheckOptions) -> PluginReport {
        let mut report = PluginReport::new(plugin.name.clone(), display_path);
        debug!("Validating {}", display_path);

        let Some(manifest) = self.check_manifest(plugin, options, &mut report) else {
            return report;
        };

        if options.icon {
            self.check_icon(plugin, &mut report);
        }

        if options.coverage {
            let tests_dir = plugin.dir.join(&self.plugins.tests_dir);
            let index = TestCoverageIndex::scan(&tests_dir, &self.test_patterns, self.plugins.max_depth);
            report.extend(check_coverage(&manifest, &index));
            report.coverage_checked = true;
        }

        report
    }

    /// Parse, schema, reference, mapping and lint checks. Returns the typed
    /// manifest when the descriptor could be read into one.
    fn check_manifest(
        &self,
        plugin: &PluginRef,
        options: CheckOptions,
        report: &mut PluginReport,
    ) -> Option<Manifest> {
        let descriptor = plugin.dir.join(&self.plugins.descriptor_file);
        if !descriptor.is_file() {
            report.push(Finding::new(
                FindingCategory::Parse,
                "/",
                format!("Descriptor file {} not found", self.plugins.descriptor_file),
            ));
            return None;
        }

        let value = match fs::read_to_string(&descriptor)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(parse_frontmatter(&content)?))
        {
            Ok(value) => value,
            Err(e) => {
                report.push(Finding::new(FindingCategory::Parse, "/", e.to_string()));
                return None;
            }
        };

        let violations = self.schema.validate(&value);
        let schema_valid = violations.is_empty();
        report.extend(
            violations
                .into_iter()
                .map(|v| Finding::new(FindingCategory::Schema, v.path, v.message)),
        );

        let manifest = match Manifest::from_value(value) {
            Ok(manifest) => manifest,
            Err(e) => {
                report.push(Finding::new(FindingCategory::Parse, "/", e.to_string()));
                return None;
            }
        };
        report.tools = manifest.tool_names().len();

        if options.references && schema_valid {
            let references = check_returns(&manifest, self.registry);
            report.extend(references.findings);
            report.extend(check_mappings(&manifest, self.registry, &references.unknown));
        }

        for block in manifest.mapping_blocks() {
            report.extend(lint_mapping(block.entries, &block.path).into_iter().map(Finding::from));
        }

        Some(manifest)
    }

    fn check_icon(&self, plugin: &PluginRef, report: &mut PluginReport) {
        let icons = &self.plugins.icon_files;
        if icons.iter().any(|icon| plugin.dir.join(icon).is_file()) {
            return;
        }

        report.push(Finding::new(
            FindingCategory::IconMissing,
            "/",
            format!("No icon file found (expected one of: {})", icons.join(", ")),
        ));
    }
}
