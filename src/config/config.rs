//! Main configuration structure and implementation

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{PluginsConfig, QuarantineConfig, RegistryConfig};
use crate::utils;

/// Default configuration file names, in lookup order
pub const DEFAULT_CONFIG_FILES: [&str; 3] = [
    ".manifest-lint.yaml",
    ".manifest-lint.yml",
    "manifest-lint.yaml",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Repository root; relative paths below are resolved against it
    pub root: PathBuf,

    /// Plugin schema file; the bundled schema is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<PathBuf>,

    /// Plugin tree settings
    pub plugins: PluginsConfig,

    /// Entity registry settings
    pub registry: RegistryConfig,

    /// Quarantine settings
    pub quarantine: QuarantineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            root: PathBuf::from("."),
            schema_path: None,
            plugins: PluginsConfig::default(),
            registry: RegistryConfig::default(),
            quarantine: QuarantineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file. A relative `root` is taken
    /// relative to the directory holding the file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path:?}"))?;
        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file {path:?}"))?;

        if config.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.root = parent.join(&config.root);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Find a default configuration file in `dir`
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        self.plugins.validate()?;
        self.registry.validate()?;
        self.quarantine.validate()?;

        Ok(())
    }

    /// Resolve a configured path: expand `~` and `$VAR`, then anchor
    /// relative paths at the root
    pub fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let expanded = utils::expand_path(path)?;
        if expanded.is_absolute() {
            return Ok(expanded);
        }

        Ok(utils::expand_path(&self.root)?.join(expanded))
    }

    pub fn plugins_dir(&self) -> Result<PathBuf> {
        self.resolve(&self.plugins.dir)
    }

    pub fn registry_dir(&self) -> Result<PathBuf> {
        self.resolve(&self.registry.dir)
    }

    /// Quarantine root, inside the plugins directory
    pub fn quarantine_dir(&self) -> Result<PathBuf> {
        Ok(self.plugins_dir()?.join(&self.quarantine.dir))
    }

    pub fn schema_path(&self) -> Result<Option<PathBuf>> {
        self.schema_path
            .as_deref()
            .map(|path| self.resolve(path))
            .transpose()
    }
}
