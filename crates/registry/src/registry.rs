//! In-memory entity index

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Known entity ids and the property names each one declares.
///
/// Only ids and property key sets are kept, never full definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registry {
    /// Every registered entity id
    ids: BTreeSet<String>,

    /// Property names per entity, for entities that declare `properties`
    properties: BTreeMap<String, BTreeSet<String>>,

    /// Later definitions of an id that was already registered
    #[serde(skip_serializing_if = "Vec::is_empty")]
    duplicates: Vec<DuplicateEntity>,
}

/// A definition that was ignored because its id was already taken
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEntity {
    pub id: String,
    pub path: PathBuf,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. The first definition of an id wins; returns
    /// `false` when the id was already present.
    pub fn insert(&mut self, id: impl Into<String>, properties: Option<BTreeSet<String>>) -> bool {
        let id = id.into();
        if self.ids.contains(&id) {
            return false;
        }

        if let Some(properties) = properties {
            self.properties.insert(id.clone(), properties);
        }
        self.ids.insert(id);
        true
    }

    pub(crate) fn record_duplicate(&mut self, id: &str, path: PathBuf) {
        self.duplicates.push(DuplicateEntity {
            id: id.to_string(),
            path,
        });
    }

    /// Check whether an entity id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Property names declared by an entity, if it declares any
    pub fn properties(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.properties.get(id)
    }

    /// All entity ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn duplicates(&self) -> &[DuplicateEntity] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Comma separated list of every entity id, for error messages
    pub fn describe_ids(&self) -> String {
        self.ids().collect::<Vec<_>>().join(", ")
    }
}
