//! Configuration for the modmeta generator
//!
//! Shared by the emission driver and the AST crate (which only needs the
//! name-conflict policy) so neither has to depend on the other.

pub mod generator;

pub use generator::{
    ConfigError, GeneratorConfig, NameConflictPolicy, CONFIG_FILE_NAME, DEFAULT_INDEX_FILE,
    DEFAULT_NAMESPACE,
};
