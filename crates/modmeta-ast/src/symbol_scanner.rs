use ahash::AHashMap;
use anyhow::{Context, Result};
use ast_grep_core::source::StrDoc;
use ast_grep_core::{AstGrep, Node};
use ast_grep_language::Rust;
use std::fs;
use std::path::Path;
use syn::parse::Parser;
use syn::{Attribute, Meta};
use tracing::{debug, trace};

use crate::discovery_types::{Attributes, DeclaredType, Member, Method, RawAttribute, TypeRole};
use crate::naming::simple_type_name;
use crate::vocabulary::{has_marker, MarkerKind};

type RustNode<'r> = Node<'r, StrDoc<Rust>>;

/// Methods and associated consts found in one `impl` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplBlock {
    /// Simple name of the implementing type
    pub self_type: String,
    pub methods: Vec<Method>,
    pub consts: Vec<Member>,
}

/// Everything the scanner found in one source file, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedFile {
    pub source_file: String,
    pub types: Vec<DeclaredType>,
    pub impls: Vec<ImplBlock>,
}

/// Scanner for declared types and their attributes using ast-grep
pub struct SymbolScanner;

impl SymbolScanner {
    /// Read and scan a single Rust file
    ///
    /// `label` is the name recorded on every declared type (usually the path
    /// relative to the crate root).
    pub fn scan_path(path: &Path, label: &str) -> Result<ScannedFile> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read source file {}", path.display()))?;
        Ok(Self::scan_source(label, &content))
    }

    /// Scan Rust source text
    pub fn scan_source(source_file: &str, content: &str) -> ScannedFile {
        let sg = AstGrep::new(content, Rust);
        let root = sg.root();

        let mut scanned = ScannedFile {
            source_file: source_file.to_string(),
            ..Default::default()
        };
        Self::walk_items(&root, &mut scanned);

        debug!(
            "Scanned {}: {} types, {} impl blocks",
            source_file,
            scanned.types.len(),
            scanned.impls.len()
        );
        scanned
    }

    /// Walk the items of a `source_file` or inline `mod` body
    ///
    /// Outer attributes are siblings that precede the item they decorate;
    /// comments between them do not break the chain.
    fn walk_items(container: &RustNode<'_>, scanned: &mut ScannedFile) {
        let mut pending = Attributes::new();

        for child in container.children() {
            match child.kind().as_ref() {
                "attribute_item" => {
                    if let Some(attribute) = parse_attribute_item(&child.text()) {
                        pending.push(attribute);
                    }
                }
                "line_comment" | "block_comment" => {}
                "struct_item" | "enum_item" => {
                    let attributes = std::mem::take(&mut pending);
                    if let Some(declared) =
                        Self::declared_type(&child, attributes, &scanned.source_file)
                    {
                        scanned.types.push(declared);
                    }
                }
                "impl_item" => {
                    pending.clear();
                    if let Some(block) = Self::impl_block(&child) {
                        scanned.impls.push(block);
                    }
                }
                "mod_item" => {
                    pending.clear();
                    if let Some(body) = child.field("body") {
                        Self::walk_items(&body, scanned);
                    }
                }
                _ => pending.clear(),
            }
        }
    }

    fn declared_type(
        node: &RustNode<'_>,
        attributes: Attributes,
        source_file: &str,
    ) -> Option<DeclaredType> {
        let name = node.field("name")?.text().to_string();
        let mut declared = DeclaredType::new(&name, source_file).with_attributes(attributes);

        if node.kind().as_ref() == "struct_item" {
            if let Some(body) = node.field("body") {
                if body.kind().as_ref() == "field_declaration_list" {
                    declared.members = Self::fields(&body);
                }
            }
        }

        trace!(
            "Declared type {} with {} attributes, {} members",
            declared.name,
            declared.attributes.len(),
            declared.members.len()
        );
        Some(declared)
    }

    fn fields(body: &RustNode<'_>) -> Vec<Member> {
        let mut members = Vec::new();
        let mut pending = Attributes::new();

        for child in body.children() {
            match child.kind().as_ref() {
                "attribute_item" => {
                    if let Some(attribute) = parse_attribute_item(&child.text()) {
                        pending.push(attribute);
                    }
                }
                "field_declaration" => {
                    let attributes = std::mem::take(&mut pending);
                    if let Some(name) = child.field("name") {
                        members.push(Member::new(&name.text(), attributes));
                    }
                }
                // punctuation and comments between attributes and their field
                _ => {}
            }
        }
        members
    }

    fn impl_block(node: &RustNode<'_>) -> Option<ImplBlock> {
        let self_type = simple_type_name(&node.field("type")?.text());
        let body = node.field("body")?;

        let mut block = ImplBlock {
            self_type,
            methods: Vec::new(),
            consts: Vec::new(),
        };
        let mut pending = Attributes::new();

        for child in body.children() {
            match child.kind().as_ref() {
                "attribute_item" => {
                    if let Some(attribute) = parse_attribute_item(&child.text()) {
                        pending.push(attribute);
                    }
                }
                "line_comment" | "block_comment" => {}
                "function_item" => {
                    let attributes = std::mem::take(&mut pending);
                    if let Some(name) = child.field("name") {
                        block.methods.push(Method::new(&name.text(), attributes));
                    }
                }
                "const_item" => {
                    let attributes = std::mem::take(&mut pending);
                    if let Some(name) = child.field("name") {
                        block.consts.push(Member::new(&name.text(), attributes));
                    }
                }
                _ => pending.clear(),
            }
        }
        Some(block)
    }
}

/// Split `#[path(args)]` into its path and argument text
///
/// The attribute is parsed with syn; the argument text is the token text of a
/// list-style attribute. Returns `None` for inner attributes and anything syn
/// does not accept as an outer attribute.
pub fn parse_attribute_item(text: &str) -> Option<RawAttribute> {
    let attribute = Attribute::parse_outer.parse_str(text).ok()?.into_iter().next()?;
    let path = attribute
        .path()
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect::<Vec<_>>()
        .join("::");

    match &attribute.meta {
        Meta::List(list) => Some(RawAttribute::new(&path, Some(&list.tokens.to_string()))),
        Meta::Path(_) | Meta::NameValue(_) => Some(RawAttribute::new(&path, None)),
    }
}

/// Attach impl members to their types and flatten everything in scan order
///
/// An impl is attached to the type of the same simple name declared in the
/// same file, otherwise to the first such type in scan order. Impls for types
/// that were not scanned are ignored.
pub fn link_declared_types(files: Vec<ScannedFile>) -> Vec<DeclaredType> {
    let mut types: Vec<DeclaredType> = Vec::new();
    let mut by_file: AHashMap<(String, String), usize> = AHashMap::new();
    let mut by_name: AHashMap<String, usize> = AHashMap::new();
    let mut impls: Vec<(String, ImplBlock)> = Vec::new();

    for file in files {
        for declared in file.types {
            let idx = types.len();
            by_file
                .entry((file.source_file.clone(), declared.name.clone()))
                .or_insert(idx);
            by_name.entry(declared.name.clone()).or_insert(idx);
            types.push(declared);
        }
        impls.extend(file.impls.into_iter().map(|b| (file.source_file.clone(), b)));
    }

    for (source_file, block) in impls {
        let target = by_file
            .get(&(source_file, block.self_type.clone()))
            .or_else(|| by_name.get(&block.self_type))
            .copied();
        match target {
            Some(idx) => {
                types[idx].methods.extend(block.methods);
                types[idx].members.extend(block.consts);
            }
            None => trace!("No declared type for impl of {}", block.self_type),
        }
    }

    types
}

/// Classify a declared type by the markers it carries
pub fn classify(declared: &DeclaredType) -> TypeRole {
    let anchor = has_marker(&declared.markers, MarkerKind::Module);
    let controller = has_marker(&declared.markers, MarkerKind::BelongsToModule);
    match (anchor, controller) {
        (true, true) => TypeRole::AnchorAndController,
        (true, false) => TypeRole::ModuleAnchor,
        (false, true) => TypeRole::Controller,
        (false, false) => TypeRole::Irrelevant,
    }
}
