//! Expression lint rules

use crate::collect::Expression;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Single-quoted literal in comparison, ternary-guard or object-literal position
static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"== *'[^']*'|'[^']*' *==|'[^']*' *\?|: *'[^']*'").expect("invalid regex")
});

/// `?` directly followed by a string literal
static TERNARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\?\s*["']"#).expect("invalid regex"));

/// The `?//` alternative operator, which is not a ternary
static ALTERNATIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\?//").expect("invalid regex"));

/// Iteration over a paginated collection without `[]?`
static BARE_ITERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.(nodes|items|edges)\[\](?:[^?]|$)").expect("invalid regex")
});

/// `((.parent // {}).nodes // [])`
static ITERATION_GUARD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(\s*\([^)]+//\s*\{\s*\}\s*\)\s*\.\s*(nodes|items|edges)\s*//\s*\[\s*\]\s*\)")
        .expect("invalid regex")
});

/// Lint rule identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintRule {
    /// Only double-quoted string literals are accepted
    Quoting,

    /// No C-style `cond ? a : b`
    Ternary,

    /// Iteration over a nullable collection without a coalescing guard
    UnguardedIteration,
}

impl LintRule {
    pub fn title(&self) -> &'static str {
        match self {
            LintRule::Quoting => "quoting",
            LintRule::Ternary => "ternary",
            LintRule::UnguardedIteration => "unguarded-iteration",
        }
    }
}

impl fmt::Display for LintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A rule violation in one expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintFinding {
    pub rule: LintRule,

    /// JSON pointer of the mapping entry holding the expression
    pub path: String,

    pub message: String,

    /// The full expression, echoed for context
    pub expression: String,
}

/// Apply every rule to one expression. Each rule reports at most once.
pub fn lint_expression(expression: &Expression<'_>) -> Vec<LintFinding> {
    let source = expression.source;
    let mut findings = Vec::new();

    let mut report = |rule: LintRule, message: String| {
        findings.push(LintFinding {
            rule,
            path: expression.path.clone(),
            message,
            expression: source.to_string(),
        });
    };

    if let Some(fragment) = SINGLE_QUOTED.find(source) {
        report(
            LintRule::Quoting,
            format!(
                "Single-quoted string literal (only double quotes are supported): {}",
                fragment.as_str()
            ),
        );
    }

    if TERNARY.is_match(source) && !ALTERNATIVE.is_match(source) {
        report(
            LintRule::Ternary,
            "C-style ternary is not supported; rewrite as `if COND then A else B end`".to_string(),
        );
    }

    if let Some(captures) = BARE_ITERATION.captures(source) {
        if !ITERATION_GUARD.is_match(source) {
            let collection = &captures[1];
            report(
                LintRule::UnguardedIteration,
                format!(
                    "Bare .{collection}[] without a null guard fails when the parent is null; \
                     use [((.parent // {{}}).{collection} // [])[] | .field]"
                ),
            );
        }
    }

    findings
}
