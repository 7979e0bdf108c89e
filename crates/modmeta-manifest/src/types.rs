//! Manifest records emitted for every module
//!
//! This module provides:
//! - `Manifest`, the normalized metadata record for one module
//! - `Route`, `Setting` and `Dependency` entries owned by a manifest
//!
//! Field names follow the JSON wire schema (camelCase). The canonical,
//! byte-stable rendering lives in [`crate::canonical`]; the serde derives
//! exist so consumers can read emitted documents back.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ManifestError;

/// Version assigned to manifests that do not declare one
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Case-insensitive lookup key for a module name
pub fn module_key(name: &str) -> String {
    name.to_lowercase()
}

// =============================================================================
// MANIFEST
// =============================================================================

/// Normalized metadata for a single module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub display_name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub events_published: Vec<String>,
    #[serde(default)]
    pub events_subscribed: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    /// Create an empty manifest for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Manifest {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Minimal manifest for a module that is only referenced by controllers
    pub fn synthesized(name: &str, routes: Vec<Route>) -> Self {
        Manifest {
            name: name.to_string(),
            display_name: name.to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: format!("Auto-generated manifest for {}", name),
            routes,
            ..Default::default()
        }
    }

    /// Fill in the defaults every emitted manifest must carry
    ///
    /// An empty display name falls back to the module name and an empty
    /// version to [`DEFAULT_VERSION`].
    pub fn apply_defaults(&mut self) {
        if self.display_name.is_empty() {
            self.display_name = self.name.clone();
        }
        if self.version.is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
    }

    /// Case-insensitive comparison against a module name
    pub fn is_named(&self, name: &str) -> bool {
        module_key(&self.name) == module_key(name)
    }

    /// Render the canonical JSON document for this manifest
    pub fn to_canonical_json(&self) -> String {
        crate::canonical::to_canonical_json(self)
    }

    /// Parse an emitted manifest document
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: Manifest = serde_json::from_str(json)?;
        if manifest.name.is_empty() {
            return Err(ManifestError::InvalidManifest(
                "manifest name is empty".to_string(),
            ));
        }
        debug!(
            "Parsed manifest {} with {} routes",
            manifest.name,
            manifest.routes.len()
        );
        Ok(manifest)
    }
}

// =============================================================================
// ENTRIES
// =============================================================================

/// HTTP route exposed by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_permission: Option<String>,
}

impl Route {
    pub fn new(method: &str, path: &str, required_permission: Option<&str>) -> Self {
        Route {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            required_permission: required_permission
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string()),
        }
    }
}

/// Configurable setting declared by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub key: String,
    #[serde(rename = "type")]
    pub setting_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Dependency on another module, version range passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub app: String,
    pub version_range: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_defaults() {
        let mut manifest = Manifest::new("Contacts");
        manifest.apply_defaults();
        assert_eq!(manifest.display_name, "Contacts");
        assert_eq!(manifest.version, DEFAULT_VERSION);

        let mut explicit = Manifest {
            name: "Billing".to_string(),
            display_name: "Billing & Invoices".to_string(),
            version: "2.1.0".to_string(),
            ..Default::default()
        };
        explicit.apply_defaults();
        assert_eq!(explicit.display_name, "Billing & Invoices");
        assert_eq!(explicit.version, "2.1.0");
    }

    #[test]
    fn test_synthesized_manifest() {
        let routes = vec![Route::new("get", "/api/stock", None)];
        let manifest = Manifest::synthesized("Inventory", routes.clone());

        assert_eq!(manifest.name, "Inventory");
        assert_eq!(manifest.display_name, "Inventory");
        assert_eq!(manifest.version, "0.1.0");
        assert_eq!(manifest.routes, routes);
        assert!(manifest.permissions.is_empty());
        assert!(manifest.settings.is_empty());
        assert!(manifest.dependencies.is_empty());
    }

    #[test]
    fn test_route_uppercases_method_and_drops_blank_permission() {
        let route = Route::new("post", "/api/items", Some(""));
        assert_eq!(route.method, "POST");
        assert_eq!(route.required_permission, None);
    }

    #[test]
    fn test_from_json_rejects_missing_name() {
        let result = Manifest::from_json(r#"{"name": "", "displayName": "", "version": ""}"#);
        assert!(matches!(result, Err(ManifestError::InvalidManifest(_))));

        let result = Manifest::from_json("not json");
        assert!(matches!(result, Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_is_named_ignores_case() {
        let manifest = Manifest::new("Contacts");
        assert!(manifest.is_named("contacts"));
        assert!(!manifest.is_named("contact"));
    }
}
