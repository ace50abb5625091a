//! Plugin manifest validation
//!
//! Validates a repository of plugin descriptors against a shared entity
//! registry: schema conformance, return type references, mapping keys,
//! mapping expression lint and test coverage. Failing plugins can be moved
//! into a quarantine tree.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod patterns;
pub mod quarantine;
pub mod report;
pub mod utils;
pub mod validate;

pub use config::Config;
pub use discovery::{PluginDiscovery, PluginRef, Selection};
pub use patterns::PatternReport;
pub use quarantine::Quarantine;
pub use report::OutputFormat;
pub use validate::{
    CheckOptions, Finding, FindingCategory, PluginReport, PluginValidator, QuarantineOutcome,
    RunReport,
};

use anyhow::{anyhow, Context, Result};
use manifest_parser::SchemaValidator;
use manifest_registry::{Registry, RegistryLoader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Options for a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub checks: CheckOptions,

    /// Move failing plugins into the quarantine tree
    pub quarantine: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            checks: CheckOptions::full(),
            quarantine: true,
        }
    }
}

impl RunOptions {
    /// Fast checks only, never touching the filesystem
    pub fn pre_commit() -> Self {
        Self {
            checks: CheckOptions::pre_commit(),
            quarantine: false,
        }
    }
}

/// Application context: configuration plus the schema and registry shared
/// by every plugin check
pub struct ManifestLint {
    config: Config,
    plugins_dir: PathBuf,
    schema: SchemaValidator,
    registry: Registry,
}

impl ManifestLint {
    /// Compile the schema and load the registry. A missing schema file,
    /// registry root or plugins root is fatal.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let schema = match config.schema_path()? {
            Some(path) => SchemaValidator::from_file(&path)?,
            None => SchemaValidator::bundled()?,
        };

        let registry_dir = config.registry_dir()?;
        let registry = RegistryLoader::new(config.registry.loader_options())
            .load(&registry_dir)
            .with_context(|| format!("Failed to load entity registry from {:?}", registry_dir))?;

        if registry.is_empty() {
            warn!("Entity registry at {:?} is empty", registry_dir);
        }

        let plugins_dir = config.plugins_dir()?;
        if !plugins_dir.is_dir() {
            return Err(anyhow!("Plugins directory not found: {:?}", plugins_dir));
        }

        Ok(Self {
            config,
            plugins_dir,
            schema,
            registry,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    fn discovery(&self) -> PluginDiscovery<'_> {
        let mut skip_dirs = self.config.plugins.skip_dirs.clone();
        skip_dirs.extend(self.config.quarantine.dir_name());

        PluginDiscovery::new(
            &self.plugins_dir,
            &self.config.plugins.descriptor_file,
            skip_dirs,
            self.config.plugins.max_depth,
        )
    }

    /// Resolve a selection against the plugins tree
    pub fn select_plugins(&self, selection: &Selection) -> Result<Vec<PluginRef>> {
        self.discovery().select(selection)
    }

    fn quarantine(&self) -> Result<Quarantine> {
        Ok(Quarantine::new(
            self.plugins_dir.clone(),
            self.config.quarantine_dir()?,
        ))
    }

    /// Report path of a plugin, relative to the repository root
    pub fn display_path(&self, plugin: &PluginRef) -> String {
        match self.plugins_dir.parent() {
            Some(base) => utils::display_relative(&plugin.dir, base),
            None => plugin.dir.display().to_string(),
        }
    }

    /// Run the checks for one plugin without moving it
    pub fn validate_plugin(&self, plugin: &PluginRef, checks: CheckOptions) -> Result<PluginReport> {
        let validator = PluginValidator::new(&self.schema, &self.registry, &self.config.plugins)?;
        Ok(validator.validate(plugin, &self.display_path(plugin), checks))
    }

    /// Validate the selected plugins. A failing plugin is moved only after
    /// all of its checks have reported.
    pub fn run(&self, selection: &Selection, options: &RunOptions) -> Result<RunReport> {
        let start = Instant::now();
        let plugins = self.select_plugins(selection)?;
        let validator = PluginValidator::new(&self.schema, &self.registry, &self.config.plugins)?;
        let quarantine = if options.quarantine && self.config.quarantine.enabled {
            Some(self.quarantine()?)
        } else {
            None
        };

        let mut report = RunReport::default();
        for plugin in &plugins {
            let mut result = validator.validate(plugin, &self.display_path(plugin), options.checks);

            if let Some(quarantine) = &quarantine {
                if !result.passed() && !quarantine.is_quarantined(&plugin.rel_path) {
                    result.quarantine = Some(quarantine.relocate(&plugin.rel_path));
                }
            }

            report.plugins.push(result);
        }

        info!(
            "Validated {} plugins ({} failed) in {:?}",
            report.plugins.len(),
            report.failed_count(),
            start.elapsed()
        );
        Ok(report)
    }

    /// Typed-reference pattern audit over the selected plugins
    pub fn audit_patterns(&self, selection: &Selection) -> Result<PatternReport> {
        let plugins = self.select_plugins(selection)?;
        let mut report = PatternReport {
            checked: plugins.len(),
            plugins: Vec::new(),
        };

        for plugin in &plugins {
            let descriptor = plugin.dir.join(&self.config.plugins.descriptor_file);
            if !descriptor.is_file() {
                warn!("No descriptor for {}, skipping", plugin.rel_path);
                continue;
            }

            if let Some(result) = patterns::audit_descriptor(&descriptor, &self.display_path(plugin))? {
                report.plugins.push(result);
            }
        }

        Ok(report)
    }
}
