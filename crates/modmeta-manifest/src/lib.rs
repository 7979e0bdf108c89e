//! Module manifest model
//!
//! Core types describing a module's static metadata (identity, permissions,
//! routes, settings, events and dependencies) together with the canonical
//! JSON writer used to embed a manifest into generated source.
//!
//! The canonical rendering is byte-stable for a given `Manifest` value, so
//! regenerating on an unchanged source tree never produces a diff.

pub mod canonical;
pub mod errors;
pub mod types;

pub use canonical::to_canonical_json;
pub use errors::ManifestError;
pub use types::{module_key, Dependency, Manifest, Route, Setting, DEFAULT_VERSION};
