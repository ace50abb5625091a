//! CLI command modules

pub mod init;
pub mod patterns;
pub mod registry;
pub mod validate;
