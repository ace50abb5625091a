//! Return type resolution against the entity registry

use manifest_parser::{join_pointer, Manifest};
use manifest_registry::Registry;
use std::collections::BTreeSet;

use super::result::{Finding, FindingCategory};

/// Outcome of the reference check
#[derive(Debug, Default)]
pub struct ReferenceCheck {
    pub findings: Vec<Finding>,

    /// Entity ids already reported as unknown, so the mapping check does
    /// not report them again
    pub unknown: BTreeSet<String>,
}

/// Require every non-void `returns` to name a registered entity
pub fn check_returns(manifest: &Manifest, registry: &Registry) -> ReferenceCheck {
    let mut check = ReferenceCheck::default();

    for (kind, name, spec) in manifest.tools() {
        let Some(entity) = spec.return_entity() else {
            continue;
        };

        if registry.contains(entity) {
            continue;
        }

        let tool_path = join_pointer(&join_pointer("", kind.section()), name);
        check.findings.push(Finding::new(
            FindingCategory::UnknownEntity,
            join_pointer(&tool_path, "returns"),
            format!(
                "{} '{}' returns unknown entity '{}'. Valid entities: {}",
                kind,
                name,
                entity,
                registry.describe_ids()
            ),
        ));
        check.unknown.insert(entity.to_string());
    }

    check
}
