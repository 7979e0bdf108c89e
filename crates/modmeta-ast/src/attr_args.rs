//! Parsing of attribute argument lists
//!
//! Attribute arguments arrive as the token text between the parentheses of
//! `#[marker(...)]`. The text is tokenized with `proc-macro2`, split at
//! top-level commas, and every piece is parsed as a `syn::Expr`. An
//! assignment `name = value` becomes a named argument, anything else a
//! positional one. Parsing never fails: a piece syn rejects is kept verbatim
//! as [`ArgValue::Other`].

use proc_macro2::{TokenStream, TokenTree};
use quote::ToTokens;
use syn::ext::IdentExt;
use syn::{Expr, Lit};

/// Value of a single attribute argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// String literal, escapes decoded
    Str(String),
    /// `[a, b, ...]`
    Array(Vec<ArgValue>),
    /// `Ident` or `Enum::Member`, split at `::`
    Path(Vec<String>),
    /// Anything else (numbers, expressions), as token text
    Other(String),
}

impl ArgValue {
    /// The string literal, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// All string literals in this value, arrays flattened in order
    pub fn strings(&self) -> Vec<&str> {
        match self {
            ArgValue::Str(s) => vec![s.as_str()],
            ArgValue::Array(items) => items.iter().flat_map(|item| item.strings()).collect(),
            _ => Vec::new(),
        }
    }

    /// Symbolic form of the value
    ///
    /// Paths resolve to their last segment (`SettingType::Int` -> `Int`),
    /// strings to their contents, anything else to its raw text.
    pub fn symbolic(&self) -> String {
        match self {
            ArgValue::Str(s) => s.clone(),
            ArgValue::Path(segments) => segments.last().cloned().unwrap_or_default(),
            ArgValue::Other(raw) => raw.clone(),
            ArgValue::Array(items) => format!(
                "[{}]",
                items
                    .iter()
                    .map(|item| item.symbolic())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// One argument of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrArg {
    /// Set for `name = value` arguments
    pub name: Option<String>,
    pub value: ArgValue,
}

/// Parsed argument list with lookup helpers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrArgs {
    pub args: Vec<AttrArg>,
}

impl AttrArgs {
    /// Parse the text between the attribute's parentheses
    ///
    /// Text that does not even tokenize (an unterminated string) becomes a
    /// single [`ArgValue::Other`].
    pub fn parse(text: &str) -> Self {
        let args = match text.parse::<TokenStream>() {
            Ok(tokens) => split_top_level(tokens)
                .into_iter()
                .map(parse_single_arg)
                .collect(),
            Err(_) if text.trim().is_empty() => Vec::new(),
            Err(_) => vec![AttrArg {
                name: None,
                value: ArgValue::Other(text.trim().to_string()),
            }],
        };
        AttrArgs { args }
    }

    /// Positional values in declaration order
    pub fn positional(&self) -> impl Iterator<Item = &ArgValue> {
        self.args
            .iter()
            .filter(|arg| arg.name.is_none())
            .map(|arg| &arg.value)
    }

    /// The `index`-th positional value
    pub fn positional_at(&self, index: usize) -> Option<&ArgValue> {
        self.positional().nth(index)
    }

    /// The `index`-th positional value as a string literal
    pub fn positional_str(&self, index: usize) -> Option<&str> {
        self.positional_at(index).and_then(ArgValue::as_str)
    }

    /// Value of the first `name = ...` argument
    pub fn named(&self, name: &str) -> Option<&ArgValue> {
        self.args
            .iter()
            .find(|arg| arg.name.as_deref() == Some(name))
            .map(|arg| &arg.value)
    }

    /// Value of the first `name = "..."` argument as a string literal
    pub fn named_str(&self, name: &str) -> Option<&str> {
        self.named(name).and_then(ArgValue::as_str)
    }

    /// Every string literal among the positional values, arrays flattened
    pub fn positional_strings(&self) -> Vec<&str> {
        self.positional().flat_map(|value| value.strings()).collect()
    }
}

/// Split a token stream at top-level commas
///
/// Brackets and parentheses are single token trees, so commas inside them
/// never split. Empty pieces (trailing commas) are dropped.
fn split_top_level(tokens: TokenStream) -> Vec<TokenStream> {
    let mut pieces = Vec::new();
    let mut current = TokenStream::new();

    for tree in tokens {
        match &tree {
            TokenTree::Punct(punct) if punct.as_char() == ',' => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.extend([tree]),
        }
    }
    pieces.push(current);

    pieces.into_iter().filter(|piece| !piece.is_empty()).collect()
}

/// Parse `name = value` or `value`
fn parse_single_arg(piece: TokenStream) -> AttrArg {
    let Ok(expr) = syn::parse2::<Expr>(piece.clone()) else {
        return AttrArg {
            name: None,
            value: ArgValue::Other(piece.to_string()),
        };
    };

    if let Expr::Assign(assign) = &expr {
        if let Some(ident) = single_ident(&assign.left) {
            return AttrArg {
                name: Some(ident),
                value: value_of(&assign.right),
            };
        }
    }

    AttrArg {
        name: None,
        value: value_of(&expr),
    }
}

/// Parse a single value expression
pub fn parse_value(text: &str) -> ArgValue {
    match syn::parse_str::<Expr>(text) {
        Ok(expr) => value_of(&expr),
        Err(_) => ArgValue::Other(text.trim().to_string()),
    }
}

fn value_of(expr: &Expr) -> ArgValue {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(lit_str) => ArgValue::Str(lit_str.value()),
            _ => ArgValue::Other(expr.to_token_stream().to_string()),
        },
        Expr::Array(array) => ArgValue::Array(array.elems.iter().map(value_of).collect()),
        Expr::Path(expr_path) if expr_path.qself.is_none() => ArgValue::Path(
            expr_path
                .path
                .segments
                .iter()
                .map(|segment| segment.ident.unraw().to_string())
                .collect(),
        ),
        Expr::Paren(paren) => value_of(&paren.expr),
        Expr::Group(group) => value_of(&group.expr),
        _ => ArgValue::Other(expr.to_token_stream().to_string()),
    }
}

/// Name of a single-segment path expression (`version`, `r#type`)
fn single_ident(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(expr_path) if expr_path.qself.is_none() => expr_path
            .path
            .get_ident()
            .map(|ident| ident.unraw().to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_positional() {
        let args = AttrArgs::parse(r#""Contacts", version = "1.2.0", description = "Address book""#);

        assert_eq!(args.positional_str(0), Some("Contacts"));
        assert_eq!(args.named_str("version"), Some("1.2.0"));
        assert_eq!(args.named_str("description"), Some("Address book"));
        assert_eq!(args.named_str("display_name"), None);
    }

    #[test]
    fn test_commas_and_equals_inside_strings() {
        let args = AttrArgs::parse(r#""a, b", label = "x = y", "[not an array]""#);

        assert_eq!(args.positional_str(0), Some("a, b"));
        assert_eq!(args.named_str("label"), Some("x = y"));
        assert_eq!(args.positional_str(1), Some("[not an array]"));
    }

    #[test]
    fn test_arrays_flatten_in_order() {
        let args = AttrArgs::parse(r#"["Contacts.Read", "Contacts.Write"], "Contacts.Admin""#);
        assert_eq!(
            args.positional_strings(),
            vec!["Contacts.Read", "Contacts.Write", "Contacts.Admin"]
        );
    }

    #[test]
    fn test_paths_and_other_values() {
        let args = AttrArgs::parse("\"Contacts.DefaultPageSize\", SettingType::Int, 42");

        assert_eq!(
            args.positional_at(1),
            Some(&ArgValue::Path(vec!["SettingType".to_string(), "Int".to_string()]))
        );
        assert_eq!(args.positional_at(1).map(ArgValue::symbolic), Some("Int".to_string()));
        assert_eq!(args.positional_at(2), Some(&ArgValue::Other("42".to_string())));
        assert_eq!(args.positional_at(2).map(ArgValue::symbolic), Some("42".to_string()));
    }

    #[test]
    fn test_escapes_and_raw_strings() {
        assert_eq!(
            parse_value(r#""say \"hi\"\n\u{e9}""#),
            ArgValue::Str("say \"hi\"\né".to_string())
        );
        assert_eq!(
            parse_value(r##"r#"C:\path "quoted""#"##),
            ArgValue::Str(r#"C:\path "quoted""#.to_string())
        );
        assert_eq!(parse_value(r#"r"plain""#), ArgValue::Str("plain".to_string()));
    }

    #[test]
    fn test_hex_escapes_are_decoded() {
        assert_eq!(
            parse_value(r#""Contacts\x2ERead""#),
            ArgValue::Str("Contacts.Read".to_string())
        );
        let args = AttrArgs::parse(r#"["Contacts\x2ERead"], "\x41dmin""#);
        assert_eq!(args.positional_strings(), vec!["Contacts.Read", "Admin"]);
    }

    #[test]
    fn test_char_literal_does_not_swallow_following_args() {
        let args = AttrArgs::parse(r#"'"', "Contacts", name = "x""#);

        assert_eq!(args.positional_at(0), Some(&ArgValue::Other("'\"'".to_string())));
        assert_eq!(args.positional_str(1), Some("Contacts"));
        assert_eq!(args.named_str("name"), Some("x"));
    }

    #[test]
    fn test_raw_identifier_names_and_unparsable_input() {
        let args = AttrArgs::parse(r#"r#type = "Int""#);
        assert_eq!(args.named_str("type"), Some("Int"));

        let args = AttrArgs::parse(r#""unterminated"#);
        assert_eq!(
            args.positional_at(0),
            Some(&ArgValue::Other("\"unterminated".to_string()))
        );
    }

    #[test]
    fn test_comparison_is_not_a_named_argument() {
        let args = AttrArgs::parse("a == b");
        assert_eq!(args.args.len(), 1);
        assert_eq!(args.args[0].name, None);
    }

    #[test]
    fn test_empty_and_trailing_commas() {
        assert!(AttrArgs::parse("").args.is_empty());
        let args = AttrArgs::parse(r#""x", "#);
        assert_eq!(args.args.len(), 1);
    }
}
