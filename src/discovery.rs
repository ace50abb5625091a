//! Plugin discovery and selection

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::utils;

/// A plugin directory to validate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginRef {
    /// Directory name of the plugin
    pub name: String,

    /// Path below the plugins directory, `/` separated (`tasks/todoist`)
    pub rel_path: String,

    /// Absolute or root-relative plugin directory
    #[serde(skip)]
    pub dir: PathBuf,
}

impl PluginRef {
    /// Reference a plugin by its path below `plugins_dir`
    pub fn new(plugins_dir: &Path, rel_path: &str) -> Self {
        let rel_path = rel_path.trim_matches('/').to_string();
        let name = rel_path.rsplit('/').next().unwrap_or(&rel_path).to_string();
        Self {
            dir: plugins_dir.join(&rel_path),
            name,
            rel_path,
        }
    }

    /// Reference a plugin at an arbitrary directory, keeping its logical path
    pub fn at(dir: PathBuf, rel_path: &str) -> Self {
        let mut plugin = Self::new(Path::new(""), rel_path);
        plugin.dir = dir;
        plugin
    }
}

/// Which plugins a run covers
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Explicit plugin paths; empty means every discovered plugin
    pub names: Vec<String>,

    /// Substring matched against plugin name or path
    pub filter: Option<String>,
}

impl Selection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    fn matches(&self, plugin: &PluginRef) -> bool {
        match &self.filter {
            Some(filter) => plugin.name.contains(filter.as_str()) || plugin.rel_path.contains(filter.as_str()),
            None => true,
        }
    }
}

/// Finds plugin directories below the plugins root
pub struct PluginDiscovery<'a> {
    plugins_dir: &'a Path,
    descriptor_file: &'a str,
    skip_dirs: Vec<String>,
    max_depth: usize,
}

impl<'a> PluginDiscovery<'a> {
    pub fn new(
        plugins_dir: &'a Path,
        descriptor_file: &'a str,
        skip_dirs: Vec<String>,
        max_depth: usize,
    ) -> Self {
        Self {
            plugins_dir,
            descriptor_file,
            skip_dirs,
            max_depth,
        }
    }

    /// Every plugin below the root, sorted by path.
    ///
    /// A directory holding the descriptor file is a plugin and is not
    /// descended into; any other directory is a category.
    pub fn discover(&self) -> Result<Vec<PluginRef>> {
        let mut plugins = Vec::new();

        let mut walker = WalkDir::new(self.plugins_dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable plugin entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') || self.skip_dirs.iter().any(|d| *d == name) {
                walker.skip_current_dir();
                continue;
            }

            if entry.path().join(self.descriptor_file).is_file() {
                let rel = entry.path().strip_prefix(self.plugins_dir)?;
                let plugin = PluginRef::new(self.plugins_dir, &utils::to_slash_path(rel));
                debug!("Discovered plugin {}", plugin.rel_path);
                plugins.push(plugin);
                walker.skip_current_dir();
            }
        }

        plugins.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        info!("Discovered {} plugins in {:?}", plugins.len(), self.plugins_dir);
        Ok(plugins)
    }

    /// Resolve a selection into plugin references
    pub fn select(&self, selection: &Selection) -> Result<Vec<PluginRef>> {
        let plugins = if selection.names.is_empty() {
            self.discover()?
        } else {
            selection
                .names
                .iter()
                .map(|name| PluginRef::new(self.plugins_dir, name))
                .collect()
        };

        Ok(plugins
            .into_iter()
            .filter(|plugin| selection.matches(plugin))
            .collect())
    }
}
