//! Naming utilities for generated symbols and route tokens

use unicode_ident::{is_xid_continue, is_xid_start};

/// Identifier used when a module name sanitizes to nothing
pub const PLACEHOLDER_IDENTIFIER: &str = "Module";

/// Suffix stripped from controller type names for the `[controller]` token
pub const CONTROLLER_SUFFIX: &str = "Controller";

/// Map a free-form module name to a safe identifier fragment
///
/// - letters, digits and `_` are kept (Unicode `XID_Continue`)
/// - space, `-` and `.` become `_`
/// - everything else is dropped
///
/// An empty result falls back to [`PLACEHOLDER_IDENTIFIER`]; a result that
/// cannot start an identifier (a leading digit) gets a `_` prefix.
///
/// - "Contacts Management" -> "Contacts_Management"
/// - "Café Módulo" -> "Café_Módulo"
/// - "123abc" -> "_123abc"
pub fn sanitize_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .filter_map(|ch| match ch {
            ' ' | '-' | '.' => Some('_'),
            c if is_xid_continue(c) => Some(c),
            _ => None,
        })
        .collect();

    if result.is_empty() {
        return PLACEHOLDER_IDENTIFIER.to_string();
    }
    if result.starts_with(|c: char| c != '_' && !is_xid_start(c)) {
        result.insert(0, '_');
    }
    result
}

/// Controller name used for `[controller]`: the type name minus an exact `Controller` suffix
pub fn controller_short_name(type_name: &str) -> &str {
    type_name
        .strip_suffix(CONTROLLER_SUFFIX)
        .unwrap_or(type_name)
}

/// Replace every occurrence of an ASCII `token`, ignoring ASCII case
pub fn replace_ignore_ascii_case(haystack: &str, token: &str, replacement: &str) -> String {
    if token.is_empty() {
        return haystack.to_string();
    }
    // ASCII lowercasing keeps byte offsets, so matches index the original text
    let lowered = haystack.to_ascii_lowercase();
    let needle = token.to_ascii_lowercase();

    let mut result = String::with_capacity(haystack.len());
    let mut last = 0;
    for (start, _) in lowered.match_indices(&needle) {
        result.push_str(&haystack[last..start]);
        result.push_str(replacement);
        last = start + needle.len();
    }
    result.push_str(&haystack[last..]);
    result
}

/// Simple name of a type as written in an `impl` header
///
/// Generic arguments, references and leading paths are removed:
/// - `ContactsController` -> `ContactsController`
/// - `crate::web::Stock<T>` -> `Stock`
/// - `&'a mut Foo` -> `Foo`
pub fn simple_type_name(type_text: &str) -> String {
    let without_generics = type_text.split('<').next().unwrap_or(type_text);
    let last_segment = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);
    last_segment
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .trim_start_matches('&')
        .to_string()
}

#[cfg(test)]
mod tests {
    use crate::naming::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Contacts Management"), "Contacts_Management");
        assert_eq!(sanitize_identifier("123abc"), "_123abc");
        assert_eq!(sanitize_identifier(""), PLACEHOLDER_IDENTIFIER);
        assert_eq!(sanitize_identifier("!!!"), PLACEHOLDER_IDENTIFIER);
        assert_eq!(sanitize_identifier("billing-v2.core"), "billing_v2_core");
        assert_eq!(sanitize_identifier("Ünïcode/Name"), "ÜnïcodeName");
    }

    #[test]
    fn test_sanitize_identifier_keeps_unicode_letters() {
        assert_eq!(sanitize_identifier("Café Módulo"), "Café_Módulo");
        assert_eq!(sanitize_identifier("Контакты"), "Контакты");
        assert_eq!(sanitize_identifier("２nd"), "_２nd");
        assert_eq!(sanitize_identifier("日本語 モジュール"), "日本語_モジュール");
        assert_eq!(sanitize_identifier("✓ Done"), "_Done");
    }

    #[test]
    fn test_controller_short_name() {
        assert_eq!(controller_short_name("ContactsController"), "Contacts");
        assert_eq!(controller_short_name("Contacts"), "Contacts");
        // exact, case-sensitive suffix only
        assert_eq!(controller_short_name("Contactscontroller"), "Contactscontroller");
        assert_eq!(controller_short_name("Controller"), "");
    }

    #[test]
    fn test_replace_ignore_ascii_case() {
        assert_eq!(
            replace_ignore_ascii_case("api/[Controller]/[controller]", "[controller]", "stock"),
            "api/stock/stock"
        );
        assert_eq!(
            replace_ignore_ascii_case("café/[ACTION]", "[action]", "list"),
            "café/list"
        );
        assert_eq!(replace_ignore_ascii_case("api", "[area]", "x"), "api");
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("ContactsController"), "ContactsController");
        assert_eq!(simple_type_name("crate::web::Stock<T>"), "Stock");
        assert_eq!(simple_type_name("&'a mut Foo"), "Foo");
    }
}
