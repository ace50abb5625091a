//! Quarantine configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarantineConfig {
    /// Move failing plugins unless disabled on the command line
    pub enabled: bool,

    /// Quarantine directory, relative to the plugins directory
    pub dir: PathBuf,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".needs-work"),
        }
    }
}

impl QuarantineConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_plain_relative(&self.dir) {
            return Err(anyhow!(
                "Quarantine directory must be a relative path without '..': {:?}",
                self.dir
            ));
        }

        Ok(())
    }

    /// Name of the top-level quarantine directory, skipped during discovery
    pub fn dir_name(&self) -> Option<String> {
        self.dir
            .components()
            .next()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
    }
}

fn is_plain_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.components().all(|c| matches!(c, Component::Normal(_)))
}
