//! Entity registry loading and lookup
//!
//! The registry is the set of shared entity types that plugin manifests
//! return and map into. It is built once per run and only read afterwards.

pub mod loader;
pub mod registry;

pub use loader::{LoaderOptions, RegistryLoader};
pub use registry::{DuplicateEntity, Registry};

use std::path::PathBuf;

/// Registry loading errors
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("Registry root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Registry root is not a directory: {0}")]
    NotADirectory(PathBuf),
}
