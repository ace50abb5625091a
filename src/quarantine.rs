//! Relocation of failing plugins into the quarantine tree

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::utils;
use crate::validate::QuarantineOutcome;

/// Moves plugin directories from the plugins tree into the quarantine
/// tree, keeping their category path
pub struct Quarantine {
    plugins_dir: PathBuf,
    quarantine_dir: PathBuf,

    /// Reported paths are relative to this directory
    display_base: PathBuf,
}

impl Quarantine {
    pub fn new(plugins_dir: PathBuf, quarantine_dir: PathBuf) -> Self {
        let display_base = plugins_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            plugins_dir,
            quarantine_dir,
            display_base,
        }
    }

    /// Destination of a plugin given its path below the plugins directory
    pub fn destination(&self, rel_path: &str) -> PathBuf {
        self.quarantine_dir.join(rel_path)
    }

    /// Check whether a plugin path already lies inside the quarantine tree
    pub fn is_quarantined(&self, rel_path: &str) -> bool {
        self.plugins_dir.join(rel_path).starts_with(&self.quarantine_dir)
    }

    /// Move a plugin. An existing destination is a conflict and leaves the
    /// source untouched.
    pub fn relocate(&self, rel_path: &str) -> QuarantineOutcome {
        let source = self.plugins_dir.join(rel_path);
        let destination = self.destination(rel_path);
        let shown = self.display(&destination);

        if destination.exists() {
            warn!(
                "Quarantine conflict: {} already exists, leaving {} in place",
                shown,
                self.display(&source)
            );
            return QuarantineOutcome::Conflict { destination: shown };
        }

        match self.move_dir(rel_path, &source, &destination) {
            Ok(()) => {
                info!("Moved {} to {}", self.display(&source), shown);
                QuarantineOutcome::Moved { destination: shown }
            }
            Err(e) => {
                warn!("Failed to quarantine {}: {}", self.display(&source), e);
                QuarantineOutcome::Failed {
                    destination: shown,
                    error: e.to_string(),
                }
            }
        }
    }

    fn move_dir(&self, rel_path: &str, source: &Path, destination: &Path) -> Result<()> {
        if rel_path.is_empty() || !utils::is_contained(Path::new(rel_path)) {
            return Err(anyhow!("Refusing to move plugin path outside the plugins tree: {}", rel_path));
        }

        if !source.is_dir() {
            return Err(anyhow!("Plugin directory does not exist: {:?}", source));
        }

        if let Some(parent) = destination.parent() {
            utils::ensure_directory(parent)?;
        }

        fs::rename(source, destination)?;
        Ok(())
    }

    /// Path as shown in reports, e.g. `plugins/.needs-work/tasks/todo`
    pub fn display(&self, path: &Path) -> String {
        utils::display_relative(path, &self.display_base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Quarantine) {
        let temp_dir = TempDir::new().unwrap();
        let plugins_dir = temp_dir.path().join("plugins");
        fs::create_dir_all(plugins_dir.join("tasks/todo")).unwrap();
        fs::write(plugins_dir.join("tasks/todo/readme.md"), "---\n---\n").unwrap();

        let quarantine = Quarantine::new(plugins_dir.clone(), plugins_dir.join(".needs-work"));
        (temp_dir, quarantine)
    }

    #[test]
    fn test_relocate_preserves_category_path() {
        let (temp_dir, quarantine) = setup();

        let outcome = quarantine.relocate("tasks/todo");
        assert_eq!(
            outcome,
            QuarantineOutcome::Moved {
                destination: "plugins/.needs-work/tasks/todo".to_string()
            }
        );

        let plugins_dir = temp_dir.path().join("plugins");
        assert!(!plugins_dir.join("tasks/todo").exists());
        assert!(plugins_dir.join(".needs-work/tasks/todo/readme.md").is_file());
    }

    #[test]
    fn test_relocate_conflict_leaves_source() {
        let (temp_dir, quarantine) = setup();
        let plugins_dir = temp_dir.path().join("plugins");
        fs::create_dir_all(plugins_dir.join(".needs-work/tasks/todo")).unwrap();

        let outcome = quarantine.relocate("tasks/todo");
        assert!(matches!(outcome, QuarantineOutcome::Conflict { .. }));
        assert!(plugins_dir.join("tasks/todo/readme.md").is_file());
    }

    #[test]
    fn test_relocate_refuses_escaping_paths() {
        let (_temp_dir, quarantine) = setup();
        let outcome = quarantine.relocate("../outside");
        assert!(matches!(outcome, QuarantineOutcome::Failed { .. }));
    }

    #[test]
    fn test_is_quarantined() {
        let (_temp_dir, quarantine) = setup();
        assert!(quarantine.is_quarantined(".needs-work/tasks/todo"));
        assert!(!quarantine.is_quarantined("tasks/todo"));
    }
}
