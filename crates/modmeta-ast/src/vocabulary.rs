//! The closed set of recognized markers
//!
//! Every attribute is matched by exact path against the names below and, if
//! recognized, parsed into a concrete marker record. Unknown attributes
//! (`derive`, `serde`, ...) are not markers and are ignored by the pipeline.
//!
//! Module markers may be written bare (`#[module(..)]`) or qualified with the
//! `modmeta::` crate path. Framework routing markers may be written bare or
//! qualified with `actix_web::` or `web::`.

use crate::attr_args::AttrArgs;
use crate::discovery_types::{Attributes, RawAttribute};

const MODULE_NAMESPACES: &[&str] = &["", "modmeta::"];
const FRAMEWORK_NAMESPACES: &[&str] = &["", "actix_web::", "web::"];

/// HTTP verb carried by a framework routing marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpVerb {
    /// Order used to pick a single verb when a method carries several
    pub const PRIORITY: [HttpVerb; 5] = [
        HttpVerb::Get,
        HttpVerb::Post,
        HttpVerb::Put,
        HttpVerb::Delete,
        HttpVerb::Patch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
            HttpVerb::Patch => "PATCH",
        }
    }

    fn from_marker_name(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpVerb::Get),
            "post" => Some(HttpVerb::Post),
            "put" => Some(HttpVerb::Put),
            "delete" => Some(HttpVerb::Delete),
            "patch" => Some(HttpVerb::Patch),
            _ => None,
        }
    }
}

/// Recognized marker names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Module,
    Permissions,
    ModuleRoute,
    Setting,
    PublishesEvents,
    SubscribesEvents,
    DependsOn,
    BelongsToModule,
    AutoRoute,
    Route,
    Area,
    Verb(HttpVerb),
}

impl MarkerKind {
    /// Match an attribute path against the vocabulary
    pub fn from_path(path: &str) -> Option<Self> {
        for namespace in MODULE_NAMESPACES {
            let Some(name) = path.strip_prefix(namespace) else {
                continue;
            };
            let kind = match name {
                "module" => Some(MarkerKind::Module),
                "permissions" => Some(MarkerKind::Permissions),
                "module_route" => Some(MarkerKind::ModuleRoute),
                "setting" => Some(MarkerKind::Setting),
                "publishes_events" => Some(MarkerKind::PublishesEvents),
                "subscribes_events" => Some(MarkerKind::SubscribesEvents),
                "depends_on" => Some(MarkerKind::DependsOn),
                "belongs_to_module" => Some(MarkerKind::BelongsToModule),
                "auto_route" => Some(MarkerKind::AutoRoute),
                _ => None,
            };
            if kind.is_some() {
                return kind;
            }
        }

        for namespace in FRAMEWORK_NAMESPACES {
            let Some(name) = path.strip_prefix(namespace) else {
                continue;
            };
            let kind = match name {
                "route" => Some(MarkerKind::Route),
                "area" => Some(MarkerKind::Area),
                other => HttpVerb::from_marker_name(other).map(MarkerKind::Verb),
            };
            if kind.is_some() {
                return kind;
            }
        }

        None
    }
}

/// `#[module(...)]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleMarker {
    pub named_name: Option<String>,
    pub positional_name: Option<String>,
    pub display_name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// `#[module_route("GET", "/path", required_permission = "...")]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplicitRouteMarker {
    pub method: String,
    pub path: String,
    pub required_permission: Option<String>,
}

/// `#[setting("Key", SettingType::Int, default_value = "25", description = "...")]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingMarker {
    pub key: String,
    pub setting_type: String,
    pub default_value: Option<String>,
    pub description: Option<String>,
}

/// `#[depends_on("App", ">=1.0.0")]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMarker {
    pub app: String,
    pub version_range: String,
}

/// `#[auto_route(required_permission = "...", method_override = "...", path_override = "...")]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoRouteMarker {
    pub required_permission: Option<String>,
    pub method_override: Option<String>,
    pub path_override: Option<String>,
}

/// A recognized attribute parsed into its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Module(ModuleMarker),
    Permissions(Vec<String>),
    ModuleRoute(ExplicitRouteMarker),
    Setting(SettingMarker),
    PublishesEvents(Vec<String>),
    SubscribesEvents(Vec<String>),
    DependsOn(DependencyMarker),
    BelongsToModule(String),
    AutoRoute(AutoRouteMarker),
    /// Framework route template; `None` for a bare `#[route]`
    Route(Option<String>),
    Area(String),
    Verb {
        verb: HttpVerb,
        template: Option<String>,
    },
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Module(_) => MarkerKind::Module,
            Marker::Permissions(_) => MarkerKind::Permissions,
            Marker::ModuleRoute(_) => MarkerKind::ModuleRoute,
            Marker::Setting(_) => MarkerKind::Setting,
            Marker::PublishesEvents(_) => MarkerKind::PublishesEvents,
            Marker::SubscribesEvents(_) => MarkerKind::SubscribesEvents,
            Marker::DependsOn(_) => MarkerKind::DependsOn,
            Marker::BelongsToModule(_) => MarkerKind::BelongsToModule,
            Marker::AutoRoute(_) => MarkerKind::AutoRoute,
            Marker::Route(_) => MarkerKind::Route,
            Marker::Area(_) => MarkerKind::Area,
            Marker::Verb { verb, .. } => MarkerKind::Verb(*verb),
        }
    }

    /// Parse an attribute, `None` when it is not part of the vocabulary
    pub fn parse(attribute: &RawAttribute) -> Option<Marker> {
        let kind = MarkerKind::from_path(&attribute.path)?;
        let args = attribute
            .args
            .as_deref()
            .map(AttrArgs::parse)
            .unwrap_or_default();

        let marker = match kind {
            MarkerKind::Module => Marker::Module(ModuleMarker {
                named_name: owned(args.named_str("name")),
                positional_name: owned(args.positional_str(0)),
                display_name: owned(args.named_str("display_name")),
                version: owned(args.named_str("version")),
                description: owned(args.named_str("description")),
            }),
            MarkerKind::Permissions => Marker::Permissions(owned_all(args.positional_strings())),
            MarkerKind::ModuleRoute => Marker::ModuleRoute(ExplicitRouteMarker {
                method: args.positional_str(0).unwrap_or_default().to_string(),
                path: args.positional_str(1).unwrap_or_default().to_string(),
                required_permission: owned(args.named_str("required_permission")),
            }),
            MarkerKind::Setting => Marker::Setting(SettingMarker {
                key: args.positional_str(0).unwrap_or_default().to_string(),
                setting_type: args
                    .positional_at(1)
                    .map(|value| value.symbolic())
                    .unwrap_or_default(),
                default_value: owned(args.named_str("default_value")),
                description: owned(args.named_str("description")),
            }),
            MarkerKind::PublishesEvents => {
                Marker::PublishesEvents(owned_all(args.positional_strings()))
            }
            MarkerKind::SubscribesEvents => {
                Marker::SubscribesEvents(owned_all(args.positional_strings()))
            }
            MarkerKind::DependsOn => Marker::DependsOn(DependencyMarker {
                app: args.positional_str(0).unwrap_or_default().to_string(),
                version_range: args.positional_str(1).unwrap_or_default().to_string(),
            }),
            MarkerKind::BelongsToModule => {
                Marker::BelongsToModule(args.positional_str(0).unwrap_or_default().to_string())
            }
            MarkerKind::AutoRoute => Marker::AutoRoute(AutoRouteMarker {
                required_permission: owned(args.named_str("required_permission")),
                method_override: owned(args.named_str("method_override")),
                path_override: owned(args.named_str("path_override")),
            }),
            MarkerKind::Route => Marker::Route(owned(args.positional_str(0))),
            MarkerKind::Area => {
                Marker::Area(args.positional_str(0).unwrap_or_default().to_string())
            }
            MarkerKind::Verb(verb) => Marker::Verb {
                verb,
                template: owned(args.positional_str(0)),
            },
        };
        Some(marker)
    }
}

/// Parse every recognized marker on an item, in declaration order
pub fn parse_markers(attributes: &Attributes) -> Vec<Marker> {
    attributes.iter().filter_map(Marker::parse).collect()
}

/// Whether any of the item's markers is of the given kind
pub fn has_marker(markers: &[Marker], kind: MarkerKind) -> bool {
    markers.iter().any(|marker| marker.kind() == kind)
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn owned_all(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(|v| v.to_string()).collect()
}
