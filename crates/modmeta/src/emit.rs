//! Rendering of generated source units
//!
//! Each manifest becomes `Manifest_<Ident>.rs` holding a single `&str`
//! constant with the canonical JSON. The index unit wraps every unit in one
//! namespace module and lists them in `ALL`.

use modmeta_ast::sanitize_identifier;
use modmeta_manifest::Manifest;
use std::collections::HashSet;

/// Prefix of every generated constant and unit file
pub const UNIT_PREFIX: &str = "Manifest_";

const GENERATED_HEADER: &str = "// @generated by modmeta. Do not edit.\n";

/// One generated source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    pub module_name: String,
    /// Identifier of the constant, e.g. `Manifest_Contacts`
    pub const_name: String,
    pub file_name: String,
    pub contents: String,
}

/// Build the unit for every manifest, in order
///
/// Sanitized names that collide (ignoring case, since unit files may land on
/// a case-insensitive filesystem) get `_2`, `_3`, ... suffixes.
pub fn plan_units(manifests: &[Manifest]) -> Vec<GeneratedUnit> {
    let mut taken: HashSet<String> = HashSet::new();

    manifests
        .iter()
        .map(|manifest| {
            let base = format!("{}{}", UNIT_PREFIX, sanitize_identifier(&manifest.name));
            let mut const_name = base.clone();
            let mut n = 2;
            while !taken.insert(const_name.to_lowercase()) {
                const_name = format!("{}_{}", base, n);
                n += 1;
            }

            let json = manifest.to_canonical_json();
            GeneratedUnit {
                module_name: manifest.name.clone(),
                file_name: format!("{}.rs", const_name),
                contents: render_unit(&const_name, &json),
                const_name,
            }
        })
        .collect()
}

/// Source text of one unit
pub fn render_unit(const_name: &str, json: &str) -> String {
    format!(
        "{header}#[allow(non_upper_case_globals)]\npub const {name}: &str = {literal};\n",
        header = GENERATED_HEADER,
        name = const_name,
        literal = raw_string_literal(json),
    )
}

/// Source text of the index unit
///
/// Units are pulled in with `include!` relative to `OUT_DIR`, so the index is
/// itself meant to be `include!`d by the consumer crate.
pub fn render_index(namespace: &str, units: &[GeneratedUnit]) -> String {
    let mut out = String::from(GENERATED_HEADER);
    out.push_str(&format!("pub mod {} {{\n", namespace));

    for unit in units {
        out.push_str(&format!(
            "    include!(concat!(env!(\"OUT_DIR\"), \"/{}\"));\n",
            unit.file_name
        ));
    }
    if !units.is_empty() {
        out.push('\n');
    }

    out.push_str("    /// Every generated manifest as `(module name, canonical JSON)`\n");
    out.push_str("    pub const ALL: &[(&str, &str)] = &[\n");
    for unit in units {
        out.push_str(&format!(
            "        ({:?}, {}),\n",
            unit.module_name, unit.const_name
        ));
    }
    out.push_str("    ];\n}\n");
    out
}

/// Wrap `text` in a raw string literal with enough `#`s to be unambiguous
pub fn raw_string_literal(text: &str) -> String {
    let mut longest = 0;
    let mut run: Option<usize> = None;
    for ch in text.chars() {
        run = match (ch, run) {
            ('"', _) => Some(0),
            ('#', Some(count)) => Some(count + 1),
            _ => None,
        };
        if let Some(count) = run {
            longest = longest.max(count);
        }
    }

    let hashes = "#".repeat(longest + 1);
    format!("r{hashes}\"{text}\"{hashes}", hashes = hashes, text = text)
}
