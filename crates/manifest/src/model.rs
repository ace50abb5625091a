//! Typed plugin manifest

use crate::ManifestError;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Return value that declares "no entity"
pub const VOID: &str = "void";

/// Suffix marking a list return type, as in `task[]`
pub const ARRAY_MARKER: &str = "[]";

/// Plugin manifest as declared in the descriptor frontmatter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Entity operations
    #[serde(default)]
    pub operations: BTreeMap<String, ToolSpec>,

    /// Helper tools that are not tied to an entity
    #[serde(default)]
    pub utilities: BTreeMap<String, ToolSpec>,

    /// Legacy tool declarations
    #[serde(default)]
    pub actions: BTreeMap<String, ToolSpec>,

    /// Entity id -> property -> mapping value
    #[serde(default)]
    pub mappings: BTreeMap<String, BTreeMap<String, MappingValue>>,

    /// Entity id -> adapter holding a `mapping` block
    #[serde(default)]
    pub adapters: BTreeMap<String, AdapterSpec>,
}

/// A declared operation, utility or action
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolSpec {
    #[serde(default)]
    pub description: Option<String>,

    /// Entity id, `entity[]`, or `void`
    #[serde(default)]
    pub returns: Option<String>,
}

impl ToolSpec {
    /// Entity this tool returns, with any list marker stripped.
    /// `None` when nothing or `void` is returned.
    pub fn return_entity(&self) -> Option<&str> {
        match self.returns.as_deref() {
            None | Some(VOID) => None,
            Some(returns) => Some(returns.strip_suffix(ARRAY_MARKER).unwrap_or(returns)),
        }
    }
}

/// Adapter declaration wrapping a mapping block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdapterSpec {
    #[serde(default)]
    pub mapping: BTreeMap<String, MappingValue>,
}

/// Right hand side of a mapping entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    /// Expression evaluated against the upstream response
    Expression(String),

    /// Nested object describing a relationship to another entity
    Reference(BTreeMap<String, MappingValue>),

    /// Any other scalar (number, bool, null) or sequence
    Literal(Value),
}

impl MappingValue {
    pub fn is_reference(&self) -> bool {
        matches!(self, MappingValue::Reference(_))
    }
}

/// Kind of declared tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ToolKind {
    Operation,
    Utility,
    Action,
}

impl ToolKind {
    /// Top-level manifest key holding tools of this kind
    pub fn section(&self) -> &'static str {
        match self {
            ToolKind::Operation => "operations",
            ToolKind::Utility => "utilities",
            ToolKind::Action => "actions",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Operation => write!(f, "Operation"),
            ToolKind::Utility => write!(f, "Utility"),
            ToolKind::Action => write!(f, "Action"),
        }
    }
}

/// One entity-scoped mapping block, wherever it was declared
#[derive(Debug, Clone)]
pub struct MappingBlock<'a> {
    /// Entity the block maps into
    pub entity: &'a str,

    /// JSON pointer of the block inside the manifest
    pub path: String,

    pub entries: &'a BTreeMap<String, MappingValue>,
}

impl Manifest {
    /// Deserialize a parsed frontmatter value
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        Ok(serde_json::from_value(value)?)
    }

    /// All declared tools, operations first, then utilities, then actions
    pub fn tools(&self) -> impl Iterator<Item = (ToolKind, &str, &ToolSpec)> {
        let operations = self
            .operations
            .iter()
            .map(|(name, spec)| (ToolKind::Operation, name.as_str(), spec));
        let utilities = self
            .utilities
            .iter()
            .map(|(name, spec)| (ToolKind::Utility, name.as_str(), spec));
        let actions = self
            .actions
            .iter()
            .map(|(name, spec)| (ToolKind::Action, name.as_str(), spec));

        operations.chain(utilities).chain(actions)
    }

    /// Union of operation, utility and action names
    pub fn tool_names(&self) -> BTreeSet<&str> {
        self.tools().map(|(_, name, _)| name).collect()
    }

    pub fn has_tools(&self) -> bool {
        !(self.operations.is_empty() && self.utilities.is_empty() && self.actions.is_empty())
    }

    /// Mapping blocks from `mappings` followed by those from `adapters`
    pub fn mapping_blocks(&self) -> Vec<MappingBlock<'_>> {
        let mut blocks: Vec<MappingBlock<'_>> = self
            .mappings
            .iter()
            .map(|(entity, entries)| MappingBlock {
                entity,
                path: join_pointer(&join_pointer("", "mappings"), entity),
                entries,
            })
            .collect();

        blocks.extend(self.adapters.iter().map(|(entity, adapter)| {
            let adapter_path = join_pointer(&join_pointer("", "adapters"), entity);
            MappingBlock {
                entity,
                path: join_pointer(&adapter_path, "mapping"),
                entries: &adapter.mapping,
            }
        }));

        blocks
    }
}

/// Append a key to a JSON pointer, escaping `~` and `/`
pub fn join_pointer(parent: &str, key: &str) -> String {
    format!("{}/{}", parent, key.replace('~', "~0").replace('/', "~1"))
}
