use modmeta_config::NameConflictPolicy;
use modmeta_logger as logger;
use modmeta_manifest::{Dependency, Manifest, Route, Setting};
use tracing::debug;

use crate::discovery_types::{DeclaredType, DiscardReason, Discards};
use crate::route_inference::normalize_path;
use crate::vocabulary::{Marker, ModuleMarker};


/// Builds a manifest from a module anchor type
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestExtractor {
    pub policy: NameConflictPolicy,
}

impl ManifestExtractor {
    pub fn new(policy: NameConflictPolicy) -> Self {
        ManifestExtractor { policy }
    }

    /// Extract the manifest declared on `declared`
    ///
    /// Returns `None` when the type is not a module anchor or its name cannot
    /// be resolved; malformed entries are dropped and recorded in `discards`.
    pub fn extract(&self, declared: &DeclaredType, discards: &mut Discards) -> Option<Manifest> {
        let owner = declared.label();
        let type_markers = &declared.markers;

        let module = type_markers.iter().find_map(|marker| match marker {
            Marker::Module(module) => Some(module),
            _ => None,
        })?;
        let name = self.resolve_name(module, &owner, discards)?;

        let mut manifest = Manifest::new(name);
        manifest.display_name = module.display_name.clone().unwrap_or_default();
        manifest.version = module.version.clone().unwrap_or_default();
        manifest.description = module.description.clone().unwrap_or_default();

        for marker in type_markers {
            match marker {
                Marker::Permissions(values) => manifest.permissions.extend(non_blank_all(values)),
                Marker::PublishesEvents(values) => {
                    manifest.events_published.extend(non_blank_all(values))
                }
                Marker::SubscribesEvents(values) => {
                    manifest.events_subscribed.extend(non_blank_all(values))
                }
                Marker::DependsOn(dependency) => {
                    if dependency.app.trim().is_empty() || dependency.version_range.trim().is_empty()
                    {
                        discards.record(&owner, DiscardReason::IncompleteDependency);
                        continue;
                    }
                    manifest.dependencies.push(Dependency {
                        app: dependency.app.clone(),
                        version_range: dependency.version_range.clone(),
                    });
                }
                _ => {}
            }
        }

        manifest.settings = Self::settings(declared, discards);
        manifest.routes = Self::explicit_routes(declared, discards);
        manifest.apply_defaults();

        debug!(
            "Extracted manifest {} from {}: {} permissions, {} routes, {} settings",
            manifest.name,
            owner,
            manifest.permissions.len(),
            manifest.routes.len(),
            manifest.settings.len()
        );
        Some(manifest)
    }

    /// Named arguments are applied first, then the positional one
    fn resolve_name(
        &self,
        module: &ModuleMarker,
        owner: &str,
        discards: &mut Discards,
    ) -> Option<String> {
        let named = non_blank(module.named_name.as_deref());
        let positional = non_blank(module.positional_name.as_deref());

        let name = match (named, positional) {
            (Some(named), Some(positional)) if named != positional => match self.policy {
                NameConflictPolicy::PositionalWins => positional,
                NameConflictPolicy::Warn => {
                    logger::warn(&format!(
                        "{} declares module name '{}' and '{}'; using '{}'",
                        owner, named, positional, positional
                    ));
                    positional
                }
                NameConflictPolicy::Reject => {
                    discards.record(
                        owner,
                        DiscardReason::ConflictingModuleName {
                            named: named.to_string(),
                            positional: positional.to_string(),
                        },
                    );
                    return None;
                }
            },
            (_, Some(positional)) => positional,
            (Some(named), None) => named,
            (None, None) => {
                discards.record(owner, DiscardReason::EmptyModuleName);
                return None;
            }
        };
        Some(name.to_string())
    }

    fn settings(declared: &DeclaredType, discards: &mut Discards) -> Vec<Setting> {
        let mut settings = Vec::new();
        for member in &declared.members {
            for marker in &member.markers {
                let Marker::Setting(setting) = marker else {
                    continue;
                };
                if setting.key.trim().is_empty() {
                    discards.record(
                        &format!("{}::{}", declared.name, member.name),
                        DiscardReason::EmptySettingKey,
                    );
                    continue;
                }
                settings.push(Setting {
                    key: setting.key.clone(),
                    setting_type: setting.setting_type.clone(),
                    default_value: setting.default_value.clone(),
                    description: setting.description.clone(),
                });
            }
        }
        settings
    }

    fn explicit_routes(declared: &DeclaredType, discards: &mut Discards) -> Vec<Route> {
        let mut routes = Vec::new();
        for method in &declared.methods {
            for marker in &method.markers {
                let Marker::ModuleRoute(route) = marker else {
                    continue;
                };
                let verb = route.method.trim();
                if verb.is_empty() || route.path.trim().is_empty() {
                    discards.record(
                        &format!("{}::{}", declared.name, method.name),
                        DiscardReason::IncompleteRoute,
                    );
                    continue;
                }
                routes.push(Route::new(
                    verb,
                    &normalize_path(&route.path),
                    route.required_permission.as_deref(),
                ));
            }
        }
        routes
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_blank_all(values: &[String]) -> impl Iterator<Item = String> + '_ {
    values
        .iter()
        .filter(|value| !value.trim().is_empty())
        .cloned()
}
