//! Validation findings and per-plugin results

use manifest_expr::{LintFinding, LintRule};
use serde::{Serialize, Serializer};
use std::fmt;

/// Finding categories, in the order the checks run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FindingCategory {
    Parse,
    Schema,
    UnknownEntity,
    UnknownProperty,
    Expression(LintRule),
    MissingCoverage,
    IconMissing,
}

impl FindingCategory {
    /// Heading used in text reports
    pub fn title(&self) -> String {
        match self {
            FindingCategory::Parse => "Parse error".to_string(),
            FindingCategory::Schema => "Schema violation".to_string(),
            FindingCategory::UnknownEntity => "Unknown entity reference".to_string(),
            FindingCategory::UnknownProperty => "Unknown mapping property".to_string(),
            FindingCategory::Expression(rule) => format!("Expression syntax ({})", rule),
            FindingCategory::MissingCoverage => "Missing test coverage".to_string(),
            FindingCategory::IconMissing => "Icon missing".to_string(),
        }
    }
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Parse => f.write_str("parse"),
            FindingCategory::Schema => f.write_str("schema"),
            FindingCategory::UnknownEntity => f.write_str("unknown-entity"),
            FindingCategory::UnknownProperty => f.write_str("unknown-property"),
            FindingCategory::Expression(rule) => write!(f, "expression/{}", rule),
            FindingCategory::MissingCoverage => f.write_str("missing-coverage"),
            FindingCategory::IconMissing => f.write_str("icon-missing"),
        }
    }
}

impl Serialize for FindingCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A single validation problem in one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub category: FindingCategory,

    /// JSON pointer into the manifest, `/` when not tied to a value
    pub path: String,

    pub message: String,

    /// Offending expression, for expression findings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

impl Finding {
    pub fn new(category: FindingCategory, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            path: path.into(),
            message: message.into(),
            expression: None,
        }
    }
}

impl From<LintFinding> for Finding {
    fn from(finding: LintFinding) -> Self {
        Self {
            category: FindingCategory::Expression(finding.rule),
            path: finding.path,
            message: finding.message,
            expression: Some(finding.expression),
        }
    }
}

/// What happened when a failing plugin was moved to quarantine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuarantineOutcome {
    Moved { destination: String },

    /// Destination already existed; the plugin stayed in place
    Conflict { destination: String },

    Failed { destination: String, error: String },
}

/// Validation result for one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    pub name: String,

    /// Display path, `plugins/<rel>`
    pub path: String,

    /// Number of declared tools, when the manifest could be read
    pub tools: usize,

    /// Whether the coverage check ran
    pub coverage_checked: bool,

    pub findings: Vec<Finding>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarantine: Option<QuarantineOutcome>,
}

impl PluginReport {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            tools: 0,
            coverage_checked: false,
            findings: Vec::new(),
            quarantine: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend<I: IntoIterator<Item = Finding>>(&mut self, findings: I) {
        self.findings.extend(findings);
    }

    /// Findings of one category
    pub fn findings_in(&self, category: FindingCategory) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.category == category)
    }
}

/// Aggregate over every validated plugin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub plugins: Vec<PluginReport>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.plugins.iter().all(PluginReport::passed)
    }

    pub fn failed_count(&self) -> usize {
        self.plugins.iter().filter(|p| !p.passed()).count()
    }

    /// 0 when every plugin passed, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}
