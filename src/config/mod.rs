//! Configuration management for manifest-lint

pub mod config;
pub mod plugins;
pub mod quarantine;
pub mod registry;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::{Config, DEFAULT_CONFIG_FILES};
pub use plugins::PluginsConfig;
pub use quarantine::QuarantineConfig;
pub use registry::RegistryConfig;
