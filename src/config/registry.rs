//! Entity registry configuration

use anyhow::{anyhow, Result};
use manifest_registry::LoaderOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root of the entity definition tree
    pub dir: PathBuf,

    /// Presentation-only directories to skip
    pub skip_dirs: Vec<String>,

    /// Files that never hold entity definitions
    pub skip_files: Vec<String>,

    /// Maximum depth of the registry walk
    pub max_depth: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        let options = LoaderOptions::default();
        Self {
            dir: PathBuf::from("entities"),
            skip_dirs: options.skip_dirs,
            skip_files: options.skip_files,
            max_depth: options.max_depth,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(anyhow!("Registry directory cannot be empty"));
        }

        if self.max_depth == 0 {
            return Err(anyhow!("Registry max_depth must be greater than zero"));
        }

        Ok(())
    }

    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions {
            skip_dirs: self.skip_dirs.clone(),
            skip_files: self.skip_files.clone(),
            max_depth: self.max_depth,
        }
    }
}
