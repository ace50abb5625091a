//! Text and JSON rendering of run reports

use anyhow::Result;
use manifest_registry::Registry;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::patterns::{PatternReport, Severity};
use crate::validate::{Finding, FindingCategory, PluginReport, QuarantineOutcome, RunReport};

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("Unknown output format: {}", other)),
        }
    }
}

/// Pretty JSON for any report
pub fn render_json<T: Serialize>(report: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Per-plugin banners with grouped findings, then a summary line
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();

    for plugin in &report.plugins {
        render_plugin(&mut out, plugin);
    }

    if report.plugins.is_empty() {
        out.push_str("No plugins to validate\n");
    } else if report.passed() {
        out.push_str("\n✅ All plugins valid\n");
    } else {
        let _ = writeln!(
            out,
            "\n❌ Validation failed: {} of {} plugins failed",
            report.failed_count(),
            report.plugins.len()
        );
    }

    out
}

fn render_plugin(out: &mut String, plugin: &PluginReport) {
    if plugin.passed() {
        let coverage = if plugin.coverage_checked { ", all tested" } else { "" };
        let _ = writeln!(out, "✓ {} ({} tools{})", plugin.path, plugin.tools, coverage);
        return;
    }

    let _ = writeln!(out, "❌ {}", plugin.path);

    let mut grouped: BTreeMap<FindingCategory, Vec<&Finding>> = BTreeMap::new();
    for finding in &plugin.findings {
        grouped.entry(finding.category).or_default().push(finding);
    }

    for (category, findings) in grouped {
        let _ = writeln!(out, "   {}", category.title());
        for finding in findings {
            let _ = writeln!(out, "     {}: {}", finding.path, finding.message);
            if let Some(expression) = &finding.expression {
                let _ = writeln!(out, "       {}", expression);
            }
        }
    }

    match &plugin.quarantine {
        Some(QuarantineOutcome::Moved { destination }) => {
            let _ = writeln!(out, "   📦 moved {} → {}", plugin.path, destination);
        }
        Some(QuarantineOutcome::Conflict { destination }) => {
            let _ = writeln!(out, "   ⚠️  not moved: {} already exists", destination);
        }
        Some(QuarantineOutcome::Failed { destination, error }) => {
            let _ = writeln!(out, "   ⚠️  failed to move to {}: {}", destination, error);
        }
        None => {}
    }
}

/// Pattern audit issues per plugin, then totals
pub fn render_patterns(report: &PatternReport, verbose: bool) -> String {
    let mut out = String::new();

    for plugin in &report.plugins {
        if plugin.issues.is_empty() && !(verbose && !plugin.typed_references.is_empty()) {
            continue;
        }

        let icon = if plugin.issues.iter().any(|i| i.severity == Severity::Error) {
            "❌"
        } else if plugin.issues.is_empty() {
            "✓"
        } else {
            "⚠️"
        };
        let _ = writeln!(out, "{} {}", icon, plugin.path);

        for issue in &plugin.issues {
            let marker = match issue.severity {
                Severity::Error => "❌",
                Severity::Warning => "⚠️ ",
            };
            let _ = writeln!(out, "   {} {}: {}", marker, issue.entity, issue.message);
        }

        if verbose {
            for references in plugin.typed_references.values() {
                for (field, entity) in references {
                    let _ = writeln!(out, "   ✓ {} → {}", field, entity);
                }
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Checked {} plugins", report.checked);
    let _ = writeln!(out, "{} plugins have typed references", report.with_typed_references());

    let (errors, warnings) = (report.errors(), report.warnings());
    if errors > 0 {
        let _ = writeln!(out, "❌ {} error(s): missing required patterns", errors);
    }
    if warnings > 0 {
        let _ = writeln!(out, "⚠️  {} warning(s): suggestions for improvement", warnings);
    }
    if errors == 0 && warnings == 0 {
        out.push_str("✅ All patterns valid\n");
    }

    out
}

/// One line per entity with its property names, then duplicates
pub fn render_registry(registry: &Registry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📦 Loaded {} entities: {}", registry.len(), registry.describe_ids());

    for id in registry.ids() {
        match registry.properties(id) {
            Some(properties) => {
                let names: Vec<&str> = properties.iter().map(String::as_str).collect();
                let _ = writeln!(out, "   {}: {}", id, names.join(", "));
            }
            None => {
                let _ = writeln!(out, "   {}", id);
            }
        }
    }

    for duplicate in registry.duplicates() {
        let _ = writeln!(
            out,
            "   ⚠️  duplicate '{}' ignored in {}",
            duplicate.id,
            duplicate.path.display()
        );
    }

    out
}
