//! Configuration tests

use super::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let yaml = serde_yaml::to_string(&config).unwrap();
    let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(config.version, parsed.version);
    assert_eq!(config.plugins.descriptor_file, parsed.plugins.descriptor_file);
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: Config = serde_yaml::from_str("registry:\n  dir: skills\n").unwrap();
    assert_eq!(config.version, "1.0");
    assert_eq!(config.registry.dir, PathBuf::from("skills"));
    assert_eq!(config.registry.skip_dirs, vec!["views".to_string()]);
    assert_eq!(config.plugins.dir, PathBuf::from("plugins"));
    assert!(config.quarantine.enabled);
}

#[test]
fn test_config_from_file_anchors_root() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".manifest-lint.yaml");

    let mut config = Config::default();
    config.plugins.dir = PathBuf::from("adapters");
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.plugins_dir().unwrap(), temp_dir.path().join(".").join("adapters"));
    assert_eq!(Config::find_in(temp_dir.path()), Some(path));
}

#[test]
fn test_config_validation() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    let mut bad_version = Config::default();
    bad_version.version = "2.0".to_string();
    assert!(bad_version.validate().is_err());

    let mut bad_pattern = Config::default();
    bad_pattern.plugins.test_file_patterns = vec!["[".to_string()];
    assert!(bad_pattern.validate().is_err());

    let mut escaping_quarantine = Config::default();
    escaping_quarantine.quarantine.dir = PathBuf::from("../elsewhere");
    assert!(escaping_quarantine.validate().is_err());

    let mut zero_depth = Config::default();
    zero_depth.registry.max_depth = 0;
    assert!(zero_depth.validate().is_err());
}

#[test]
fn test_resolve_paths() {
    let config = Config {
        root: PathBuf::from("/repo"),
        ..Config::default()
    };

    assert_eq!(config.plugins_dir().unwrap(), Path::new("/repo/plugins"));
    assert_eq!(config.registry_dir().unwrap(), Path::new("/repo/entities"));
    assert_eq!(
        config.quarantine_dir().unwrap(),
        Path::new("/repo/plugins/.needs-work")
    );
    assert_eq!(config.resolve(Path::new("/abs/schema.json")).unwrap(), Path::new("/abs/schema.json"));
    assert_eq!(config.schema_path().unwrap(), None);
}

#[test]
fn test_quarantine_dir_name() {
    let config = QuarantineConfig::default();
    assert_eq!(config.dir_name().as_deref(), Some(".needs-work"));
}
