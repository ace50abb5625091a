//! Mapping key validation against entity properties

use manifest_parser::{join_pointer, Manifest};
use manifest_registry::Registry;
use std::collections::BTreeSet;
use tracing::debug;

use super::result::{Finding, FindingCategory};

/// Prefix of internal keys that are never entity properties
const INTERNAL_PREFIX: char = '_';

/// Check every mapping key against the mapped entity's property names.
///
/// Entities in `flagged` were already reported by the reference check and
/// are skipped. Entities missing from the registry are reported once.
pub fn check_mappings(
    manifest: &Manifest,
    registry: &Registry,
    flagged: &BTreeSet<String>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut reported: BTreeSet<&str> = BTreeSet::new();

    for block in manifest.mapping_blocks() {
        if flagged.contains(block.entity) {
            continue;
        }

        if !registry.contains(block.entity) {
            if reported.insert(block.entity) {
                findings.push(Finding::new(
                    FindingCategory::UnknownEntity,
                    block.path.clone(),
                    format!(
                        "Mapping targets unknown entity '{}'. Valid entities: {}",
                        block.entity,
                        registry.describe_ids()
                    ),
                ));
            }
            continue;
        }

        let Some(properties) = registry.properties(block.entity) else {
            debug!("Entity '{}' declares no properties, skipping mapping check", block.entity);
            continue;
        };

        for (key, value) in block.entries {
            if key.starts_with(INTERNAL_PREFIX) || value.is_reference() {
                continue;
            }

            let property = key.split('.').next().unwrap_or(key);
            if properties.contains(property) {
                continue;
            }

            findings.push(Finding::new(
                FindingCategory::UnknownProperty,
                join_pointer(&block.path, key),
                format!(
                    "Entity '{}' has no property '{}'. Valid: {}",
                    block.entity,
                    property,
                    properties.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
                ),
            ));
        }
    }

    findings
}
