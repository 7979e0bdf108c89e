//! Local types for attribute scanning
//!
//! These types describe what the scanner saw in the source tree. They are
//! distinct from the manifest types and keep syntax details out of the
//! manifest crate.

use smallvec::SmallVec;
use std::fmt;

use crate::vocabulary::{parse_markers, Marker};

/// Attributes attached to a single item; most items carry only a few
pub type Attributes = SmallVec<[RawAttribute; 4]>;

/// An outer attribute as written in source, e.g. `#[get("adjust")]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAttribute {
    /// Attribute path with whitespace removed (e.g., "get", "modmeta::module")
    pub path: String,
    /// Text between the parentheses, `None` for `#[get]`
    pub args: Option<String>,
}

impl RawAttribute {
    pub fn new(path: &str, args: Option<&str>) -> Self {
        RawAttribute {
            path: path.chars().filter(|c| !c.is_whitespace()).collect(),
            args: args.map(|a| a.to_string()),
        }
    }
}

/// A field or associated const of a declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub attributes: Attributes,
    /// Recognized markers among `attributes`, parsed once at scan time
    pub markers: Vec<Marker>,
}

impl Member {
    pub fn new(name: &str, attributes: Attributes) -> Self {
        Member {
            name: name.to_string(),
            markers: parse_markers(&attributes),
            attributes,
        }
    }
}

/// A function defined in an `impl` block of a declared type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub attributes: Attributes,
    pub markers: Vec<Marker>,
}

impl Method {
    pub fn new(name: &str, attributes: Attributes) -> Self {
        Method {
            name: name.to_string(),
            markers: parse_markers(&attributes),
            attributes,
        }
    }
}

/// A `struct` or `enum` together with everything attached to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub name: String,
    /// Source file the type was declared in (as given to the scanner)
    pub source_file: String,
    pub attributes: Attributes,
    /// Recognized type-level markers, parsed once at scan time
    pub markers: Vec<Marker>,
    pub members: Vec<Member>,
    pub methods: Vec<Method>,
}

impl DeclaredType {
    pub fn new(name: &str, source_file: &str) -> Self {
        DeclaredType {
            name: name.to_string(),
            source_file: source_file.to_string(),
            attributes: Attributes::new(),
            markers: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the type-level attributes and parse their markers
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.markers = parse_markers(&attributes);
        self.attributes = attributes;
        self
    }

    /// Qualified label used in logs and discard records
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.source_file)
    }
}

/// What a declared type contributes to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRole {
    /// Carries the module marker
    ModuleAnchor,
    /// Carries the belongs-to marker
    Controller,
    /// Carries both markers
    AnchorAndController,
    Irrelevant,
}

impl TypeRole {
    pub fn is_anchor(self) -> bool {
        matches!(self, TypeRole::ModuleAnchor | TypeRole::AnchorAndController)
    }

    pub fn is_controller(self) -> bool {
        matches!(self, TypeRole::Controller | TypeRole::AnchorAndController)
    }
}

/// Why an annotation did not make it into a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscardReason {
    EmptyModuleName,
    ConflictingModuleName { named: String, positional: String },
    DuplicateModule(String),
    IncompleteRoute,
    EmptySettingKey,
    IncompleteDependency,
    EmptyBelongsTo,
    NoRouteTemplate(String),
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscardReason::EmptyModuleName => write!(f, "module marker without a name"),
            DiscardReason::ConflictingModuleName { named, positional } => write!(
                f,
                "module name given as both '{}' (named) and '{}' (positional)",
                named, positional
            ),
            DiscardReason::DuplicateModule(name) => {
                write!(f, "module '{}' is already declared by another type", name)
            }
            DiscardReason::IncompleteRoute => write!(f, "route marker without method or path"),
            DiscardReason::EmptySettingKey => write!(f, "setting marker without a key"),
            DiscardReason::IncompleteDependency => {
                write!(f, "dependency marker without app name or version range")
            }
            DiscardReason::EmptyBelongsTo => write!(f, "belongs-to marker without a module name"),
            DiscardReason::NoRouteTemplate(method) => write!(
                f,
                "auto-routed method '{}' has no HTTP verb or route marker",
                method
            ),
        }
    }
}

/// A dropped entry and the item it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discard {
    pub owner: String,
    pub reason: DiscardReason,
}

/// Collects discards and logs each one as it is recorded
#[derive(Debug, Default)]
pub struct Discards {
    entries: Vec<Discard>,
}

impl Discards {
    pub fn record(&mut self, owner: &str, reason: DiscardReason) {
        tracing::debug!("Discarded annotation on {}: {}", owner, reason);
        self.entries.push(Discard {
            owner: owner.to_string(),
            reason,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Discard> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Discard> {
        self.entries
    }
}
