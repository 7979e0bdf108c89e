//! Route inference from controller types
//!
//! Controllers opt into a module with `#[belongs_to_module("Name")]` and
//! expose actions through `#[auto_route]` methods. Routes are built from the
//! controller's `route` prefixes and each action's verb markers, then grouped
//! by module name in first-seen order.

use indexmap::IndexMap;
use modmeta_manifest::{module_key, Route};
use tracing::{debug, trace};

use crate::discovery_types::{DeclaredType, DiscardReason, Discards, Method};
use crate::naming::controller_short_name;
use crate::vocabulary::{HttpVerb, Marker};

pub mod paths;


pub use paths::{combine_template, normalize_path, RouteTokens};

/// Routes inferred for one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredModule {
    /// Module name exactly as first written on a controller
    pub name: String,
    pub routes: Vec<Route>,
}

/// Module name -> inferred routes, in order of first appearance
#[derive(Debug, Clone, Default)]
pub struct InferredRoutes {
    modules: IndexMap<String, InferredModule>,
}

impl InferredRoutes {
    /// Fold every controller in `types` into a routes-by-module map
    pub fn infer(types: &[DeclaredType], discards: &mut Discards) -> Self {
        let inferred = types.iter().fold(InferredRoutes::default(), |mut acc, declared| {
            acc.add_controller(declared, discards);
            acc
        });
        debug!(
            "Inferred routes for {} modules from {} types",
            inferred.len(),
            types.len()
        );
        inferred
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&InferredModule> {
        self.modules.get(&module_key(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InferredModule> {
        self.modules.values()
    }

    pub fn into_modules(self) -> Vec<InferredModule> {
        self.modules.into_values().collect()
    }

    fn add_controller(&mut self, declared: &DeclaredType, discards: &mut Discards) {
        let Some(module_name) = declared.markers.iter().find_map(|marker| match marker {
            Marker::BelongsToModule(name) => Some(name.trim()),
            _ => None,
        }) else {
            return;
        };
        if module_name.is_empty() {
            discards.record(&declared.label(), DiscardReason::EmptyBelongsTo);
            return;
        }

        let controller = ControllerContext::new(declared);
        let mut routes = Vec::new();
        for method in &declared.methods {
            routes.extend(controller.action_routes(method, discards));
        }

        trace!(
            "Controller {} contributes {} routes to {}",
            declared.name,
            routes.len(),
            module_name
        );

        // a controller without actions still registers its module
        self.modules
            .entry(module_key(module_name))
            .or_insert_with(|| InferredModule {
                name: module_name.to_string(),
                routes: Vec::new(),
            })
            .routes
            .extend(routes);
    }
}

/// Per-controller values shared by all of its actions
struct ControllerContext<'a> {
    type_name: &'a str,
    short_name: &'a str,
    prefixes: Vec<String>,
    area: Option<String>,
}

impl<'a> ControllerContext<'a> {
    fn new(declared: &'a DeclaredType) -> Self {
        let mut prefixes: Vec<String> = declared
            .markers
            .iter()
            .filter_map(|marker| match marker {
                Marker::Route(template) => Some(template.clone().unwrap_or_default()),
                _ => None,
            })
            .collect();
        if prefixes.is_empty() {
            prefixes.push(String::new());
        }

        let area = declared.markers.iter().find_map(|marker| match marker {
            Marker::Area(area) if !area.trim().is_empty() => Some(area.trim().to_string()),
            _ => None,
        });

        ControllerContext {
            type_name: &declared.name,
            short_name: controller_short_name(&declared.name),
            prefixes,
            area,
        }
    }

    fn action_routes(&self, method: &Method, discards: &mut Discards) -> Vec<Route> {
        let method_markers = &method.markers;
        let Some(auto) = method_markers.iter().find_map(|marker| match marker {
            Marker::AutoRoute(auto) => Some(auto),
            _ => None,
        }) else {
            return Vec::new();
        };

        let verbs: Vec<(HttpVerb, &str)> = method_markers
            .iter()
            .filter_map(|marker| match marker {
                Marker::Verb { verb, template } => {
                    Some((*verb, template.as_deref().unwrap_or_default()))
                }
                _ => None,
            })
            .collect();
        let method_override = non_blank(auto.method_override.as_deref());
        let permission = non_blank(auto.required_permission.as_deref());

        if let Some(path) = non_blank(auto.path_override.as_deref()) {
            let verb = method_override
                .unwrap_or_else(|| priority_verb(&verbs).as_str());
            return vec![Route::new(verb, &normalize_path(path), permission)];
        }

        let tokens = RouteTokens {
            controller: self.short_name,
            action: &method.name,
            area: self.area.as_deref(),
        };

        let mut templates: Vec<(&str, &str)> = verbs
            .iter()
            .map(|(verb, template)| (verb.as_str(), *template))
            .collect();
        if templates.is_empty() {
            templates = method_markers
                .iter()
                .filter_map(|marker| match marker {
                    Marker::Route(template) => {
                        Some((HttpVerb::Get.as_str(), template.as_deref().unwrap_or_default()))
                    }
                    _ => None,
                })
                .collect();
        }
        if templates.is_empty() {
            discards.record(
                &format!("{}::{}", self.type_name, method.name),
                DiscardReason::NoRouteTemplate(method.name.clone()),
            );
            return Vec::new();
        }

        let mut routes = Vec::with_capacity(templates.len() * self.prefixes.len());
        for (verb, template) in templates {
            for prefix in &self.prefixes {
                let path = normalize_path(&tokens.substitute(&combine_template(prefix, template)));
                routes.push(Route::new(method_override.unwrap_or(verb), &path, permission));
            }
        }
        routes
    }
}

/// Highest-priority verb among the markers, GET when there are none
fn priority_verb(verbs: &[(HttpVerb, &str)]) -> HttpVerb {
    HttpVerb::PRIORITY
        .into_iter()
        .find(|candidate| verbs.iter().any(|(verb, _)| verb == candidate))
        .unwrap_or(HttpVerb::Get)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
