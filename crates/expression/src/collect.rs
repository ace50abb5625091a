//! Expression collection from mapping blocks

use manifest_parser::{join_pointer, MappingValue};
use std::collections::BTreeMap;

/// Substrings that make an expression worth linting. Plain field access
/// such as `.id` never matches any rule, so it is skipped.
const LINT_MARKERS: [&str; 7] = ["==", "if ", "[]", "//", "|", "?", "'"];

/// An expression string and where it was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression<'a> {
    /// JSON pointer of the mapping entry
    pub path: String,

    pub source: &'a str,
}

pub fn is_lint_candidate(source: &str) -> bool {
    LINT_MARKERS.iter().any(|marker| source.contains(marker))
}

/// Walk a mapping block, descending into typed references, and return the
/// expressions that pass the candidate prefilter.
pub fn collect_expressions<'a>(
    entries: &'a BTreeMap<String, MappingValue>,
    parent: &str,
) -> Vec<Expression<'a>> {
    let mut expressions = Vec::new();

    for (key, value) in entries {
        let path = join_pointer(parent, key);
        match value {
            MappingValue::Expression(source) if is_lint_candidate(source) => {
                expressions.push(Expression { path, source });
            }
            MappingValue::Reference(nested) => {
                expressions.extend(collect_expressions(nested, &path));
            }
            _ => {}
        }
    }

    expressions
}
