//! Textual test coverage of declared tools
//!
//! Test sources are scanned for `tool: "<name>"` literals. This is a
//! textual proxy: disabled tests and dynamically built tool names are not
//! detected.

use glob::Pattern;
use manifest_parser::{join_pointer, Manifest};
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::result::{Finding, FindingCategory};

/// `tool: 'name'` or `tool: "name"`
static TOOL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"tool:\s*['"]([^'"]+)['"]"#).expect("invalid regex"));

/// Tool names referenced by a plugin's tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCoverageIndex {
    tools: BTreeSet<String>,
}

impl TestCoverageIndex {
    /// Scan test files below `tests_dir` whose names match one of
    /// `patterns`. A missing directory yields an empty index; unreadable
    /// entries are logged and skipped, and invalid UTF-8 is decoded lossily.
    pub fn scan(tests_dir: &Path, patterns: &[Pattern], max_depth: usize) -> Self {
        let mut index = Self::default();
        if !tests_dir.is_dir() {
            debug!("No tests directory at {:?}", tests_dir);
            return index;
        }

        for entry in WalkDir::new(tests_dir)
            .follow_links(false)
            .max_depth(max_depth)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable test entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !patterns.iter().any(|p| p.matches(&file_name)) {
                continue;
            }

            match fs::read(entry.path()) {
                Ok(bytes) => index.add_source(&String::from_utf8_lossy(&bytes)),
                Err(e) => warn!("Skipping unreadable test file {:?}: {}", entry.path(), e),
            }
        }

        debug!("Found {} tested tools in {:?}", index.tools.len(), tests_dir);
        index
    }

    /// Build an index from in-memory sources
    pub fn from_sources<'a, I: IntoIterator<Item = &'a str>>(sources: I) -> Self {
        let mut index = Self::default();
        for source in sources {
            index.add_source(source);
        }
        index
    }

    fn add_source(&mut self, source: &str) {
        self.tools.extend(
            TOOL_REFERENCE
                .captures_iter(source)
                .map(|captures| captures[1].to_string()),
        );
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.tools.contains(tool)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// One finding per declared tool name that no test references. A name
/// declared in more than one section is reported once, at its first
/// declaration.
pub fn check_coverage(manifest: &Manifest, index: &TestCoverageIndex) -> Vec<Finding> {
    let mut reported = BTreeSet::new();

    manifest
        .tools()
        .filter(|(_, name, _)| !index.contains(name) && reported.insert(*name))
        .map(|(kind, name, _)| {
            Finding::new(
                FindingCategory::MissingCoverage,
                join_pointer(&join_pointer("", kind.section()), name),
                format!("{} '{}' is not referenced by any test (tool: \"{}\")", kind, name, name),
            )
        })
        .collect()
}
