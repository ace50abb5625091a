//! Static linting of mapping expressions
//!
//! Mapping values are expressions in a jq-like language that the plugin
//! runtime evaluates against upstream API responses. This crate never
//! evaluates them; it only flags text patterns that are known to be
//! rejected by the language or to fail at evaluation time.

pub mod collect;
pub mod rules;

pub use collect::{collect_expressions, is_lint_candidate, Expression};
pub use rules::{lint_expression, LintFinding, LintRule};

use manifest_parser::MappingValue;
use std::collections::BTreeMap;

/// Collect and lint every expression in a mapping block
pub fn lint_mapping(entries: &BTreeMap<String, MappingValue>, path: &str) -> Vec<LintFinding> {
    collect_expressions(entries, path)
        .iter()
        .flat_map(lint_expression)
        .collect()
}
