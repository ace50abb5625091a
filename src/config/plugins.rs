//! Plugin tree configuration and validation

use anyhow::{anyhow, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Plugin tree configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Directory holding plugin (and category) directories
    pub dir: PathBuf,

    /// File whose presence marks a plugin directory
    pub descriptor_file: String,

    /// Accepted icon file names; one must exist
    pub icon_files: Vec<String>,

    /// Test subdirectory inside each plugin
    pub tests_dir: String,

    /// Glob patterns selecting test source files
    pub test_file_patterns: Vec<String>,

    /// Directory names never treated as plugins or categories
    pub skip_dirs: Vec<String>,

    /// Maximum category nesting below the plugins directory
    pub max_depth: usize,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("plugins"),
            descriptor_file: "readme.md".to_string(),
            icon_files: vec!["icon.svg".to_string(), "icon.png".to_string()],
            tests_dir: "tests".to_string(),
            test_file_patterns: vec!["*.test.ts".to_string()],
            skip_dirs: vec!["node_modules".to_string(), "tests".to_string()],
            max_depth: 16,
        }
    }
}

impl PluginsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(anyhow!("Plugins directory cannot be empty"));
        }

        if self.descriptor_file.is_empty() {
            return Err(anyhow!("Plugin descriptor file name cannot be empty"));
        }

        if self.icon_files.is_empty() {
            return Err(anyhow!("At least one icon file name must be configured"));
        }

        if self.tests_dir.is_empty() {
            return Err(anyhow!("Plugin tests directory cannot be empty"));
        }

        if self.max_depth == 0 {
            return Err(anyhow!("Plugin max_depth must be greater than zero"));
        }

        self.compile_test_patterns()?;
        Ok(())
    }

    /// Compile the test file globs
    pub fn compile_test_patterns(&self) -> Result<Vec<Pattern>> {
        self.test_file_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .map_err(|e| anyhow!("Invalid test file pattern '{}': {}", pattern, e))
            })
            .collect()
    }
}
