//! Registry loader implementation

use crate::registry::Registry;
use crate::RegistryError;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Options controlling which parts of the registry tree are scanned
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Directory names that hold presentation assets, not entities
    pub skip_dirs: Vec<String>,

    /// File names that are never entity documents
    pub skip_files: Vec<String>,

    /// Maximum directory depth below the registry root
    pub max_depth: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            skip_dirs: vec!["views".to_string()],
            skip_files: vec!["icon.yaml".to_string()],
            max_depth: 32,
        }
    }
}

pub struct RegistryLoader {
    options: LoaderOptions,
}

impl Default for RegistryLoader {
    fn default() -> Self {
        Self::new(LoaderOptions::default())
    }
}

impl RegistryLoader {
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Load every entity definition below `root`.
    ///
    /// Unreadable files and malformed documents are logged and skipped.
    /// Symlinks are not followed and the walk stops at `max_depth`.
    pub fn load(&self, root: &Path) -> Result<Registry, RegistryError> {
        if !root.exists() {
            return Err(RegistryError::RootNotFound(root.to_path_buf()));
        }
        if !root.is_dir() {
            return Err(RegistryError::NotADirectory(root.to_path_buf()));
        }

        info!("Loading entity registry from {:?}", root);

        let mut registry = Registry::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(self.options.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.is_skipped_dir(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable registry entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_registry_file(entry.path()) {
                self.load_file(entry.path(), &mut registry);
            }
        }

        info!("Loaded {} entities", registry.len());
        Ok(registry)
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        name.starts_with('.') || self.options.skip_dirs.iter().any(|d| *d == name)
    }

    fn is_registry_file(&self, path: &Path) -> bool {
        let is_yaml = path
            .extension()
            .map(|ext| ext == "yaml" || ext == "yml")
            .unwrap_or(false);

        let skipped = path
            .file_name()
            .map(|name| self.options.skip_files.iter().any(|f| name == f.as_str()))
            .unwrap_or(false);

        is_yaml && !skipped
    }

    /// Register every entity document in one file
    fn load_file(&self, path: &Path, registry: &mut Registry) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return;
            }
        };

        for (index, document) in serde_yaml::Deserializer::from_str(&content).enumerate() {
            match Value::deserialize(document) {
                Ok(value) => self.register_document(&value, path, registry),
                Err(e) => {
                    // The stream cannot be resumed after a syntax error.
                    let unread = count_documents(&content).saturating_sub(index + 1);
                    warn!(
                        "Failed to parse {} (document {}): {}; {} later document(s) left unread",
                        path.display(),
                        index + 1,
                        e,
                        unread
                    );
                    break;
                }
            }
        }
    }

    fn register_document(&self, doc: &Value, path: &Path, registry: &mut Registry) {
        if let Some(id) = doc.get("id") {
            match id.as_str() {
                Some(id) => self.register(registry, id, doc.get("properties"), path),
                None => warn!("Ignoring document with non-string id in {}", path.display()),
            }
            return;
        }

        // Legacy bundle: { domain, entities: { <id>: { properties, ... } } }
        if let Some(entities) = doc.get("entities").and_then(Value::as_mapping) {
            for (key, definition) in entities {
                match key.as_str() {
                    Some(id) => self.register(registry, id, definition.get("properties"), path),
                    None => warn!("Ignoring bundled entity with non-string key in {}", path.display()),
                }
            }
            return;
        }

        debug!("Document in {} is not an entity definition", path.display());
    }

    fn register(&self, registry: &mut Registry, id: &str, properties: Option<&Value>, path: &Path) {
        let names: Option<BTreeSet<String>> = properties.and_then(Value::as_mapping).map(|props| {
            props
                .keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect()
        });

        if registry.insert(id, names) {
            debug!("Registered entity '{}' from {}", id, path.display());
        } else {
            warn!(
                "Duplicate entity id '{}' in {} ignored (first definition wins)",
                id,
                path.display()
            );
            registry.record_duplicate(id, path.to_path_buf());
        }
    }
}

/// Number of documents in a YAML stream, counted from `---` separator
/// lines. A stream that does not open with a separator has one implicit
/// leading document.
fn count_documents(content: &str) -> usize {
    let mut separators = 0;
    let mut leading_content = false;

    for line in content.lines() {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed.starts_with("--- ") {
            separators += 1;
        } else if separators == 0 && !trimmed.is_empty() && !trimmed.starts_with('#') {
            leading_content = true;
        }
    }

    separators + usize::from(leading_content)
}
