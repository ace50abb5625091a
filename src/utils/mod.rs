//! Utility functions for manifest-lint

use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    } else if !path.is_dir() {
        return Err(anyhow!("Path exists but is not a directory: {:?}", path));
    }
    Ok(())
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();
    if !path_str.contains('~') && !path_str.contains('$') {
        return Ok(path.to_path_buf());
    }

    let expanded = shellexpand::full(&path_str)
        .map_err(|e| anyhow!("Failed to expand path {:?}: {}", path, e))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Relative path with `/` separators, as used in reports
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Display `path` relative to `base` when it lies below it
pub fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .map(to_slash_path)
        .unwrap_or_else(|_| path.display().to_string())
}

/// Check that a relative path never climbs out of its base
pub fn is_contained(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
