//! Canonical JSON rendering for manifests
//!
//! The output is part of the external contract, so the layout is fixed:
//! - keys always appear in the same order and are always present
//! - scalar arrays put one value per line
//! - record arrays put one single-line object per entry
//! - optional record fields are omitted, never emitted as `null`
//!
//! Only backslash, double quote, newline, carriage return and tab are escaped.

use crate::types::{Dependency, Manifest, Route, Setting};

const INDENT: &str = "  ";

/// Render a manifest as its canonical JSON document
pub fn to_canonical_json(manifest: &Manifest) -> String {
    let mut out = String::with_capacity(512);
    out.push_str("{\n");

    let mut fields = FieldWriter::new(&mut out);
    fields.scalar("name", &manifest.name);
    fields.scalar("displayName", &manifest.display_name);
    fields.scalar("version", &manifest.version);
    fields.scalar("description", &manifest.description);
    fields.string_array("permissions", &manifest.permissions);
    fields.record_array("routes", manifest.routes.iter().map(route_object));
    fields.record_array("settings", manifest.settings.iter().map(setting_object));
    fields.string_array("eventsPublished", &manifest.events_published);
    fields.string_array("eventsSubscribed", &manifest.events_subscribed);
    fields.record_array(
        "dependencies",
        manifest.dependencies.iter().map(dependency_object),
    );

    out.push_str("\n}");
    out
}

/// Quote and escape a string value
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}

/// Writes top-level `"key": value` pairs separated by `,\n`
struct FieldWriter<'a> {
    out: &'a mut String,
    first: bool,
}

impl<'a> FieldWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        FieldWriter { out, first: true }
    }

    fn key(&mut self, key: &str) {
        if !self.first {
            self.out.push_str(",\n");
        }
        self.first = false;
        self.out.push_str(INDENT);
        self.out.push_str(&quote(key));
        self.out.push_str(": ");
    }

    fn scalar(&mut self, key: &str, value: &str) {
        self.key(key);
        self.out.push_str(&quote(value));
    }

    fn string_array(&mut self, key: &str, values: &[String]) {
        self.lines(key, values.iter().map(|v| quote(v)));
    }

    fn record_array<I>(&mut self, key: &str, records: I)
    where
        I: Iterator<Item = String>,
    {
        self.lines(key, records);
    }

    fn lines<I>(&mut self, key: &str, items: I)
    where
        I: Iterator<Item = String>,
    {
        self.key(key);
        let items: Vec<String> = items.collect();
        if items.is_empty() {
            self.out.push_str("[]");
            return;
        }
        self.out.push_str("[\n");
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                self.out.push_str(",\n");
            }
            self.out.push_str(INDENT);
            self.out.push_str(INDENT);
            self.out.push_str(item);
        }
        self.out.push('\n');
        self.out.push_str(INDENT);
        self.out.push(']');
    }
}

/// Render `{"a": "x", "b": "y"}` on a single line, skipping absent values
fn inline_object(pairs: &[(&str, Option<&str>)]) -> String {
    let body: Vec<String> = pairs
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{}: {}", quote(key), quote(v))))
        .collect();
    format!("{{{}}}", body.join(", "))
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn route_object(route: &Route) -> String {
    inline_object(&[
        ("method", Some(route.method.as_str())),
        ("path", Some(route.path.as_str())),
        (
            "requiredPermission",
            non_empty(route.required_permission.as_ref()),
        ),
    ])
}

fn setting_object(setting: &Setting) -> String {
    inline_object(&[
        ("key", Some(setting.key.as_str())),
        ("type", Some(setting.setting_type.as_str())),
        ("defaultValue", non_empty(setting.default_value.as_ref())),
        ("description", non_empty(setting.description.as_ref())),
    ])
}

fn dependency_object(dependency: &Dependency) -> String {
    inline_object(&[
        ("app", Some(dependency.app.as_str())),
        ("versionRange", Some(dependency.version_range.as_str())),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_VERSION;

    fn contacts_manifest() -> Manifest {
        Manifest {
            name: "Contacts".to_string(),
            display_name: "Contacts".to_string(),
            version: DEFAULT_VERSION.to_string(),
            description: "Address book".to_string(),
            permissions: vec!["Contacts.Read".to_string(), "Contacts.Write".to_string()],
            routes: vec![Route::new("GET", "/api/contacts", Some("Contacts.Read"))],
            settings: vec![Setting {
                key: "Contacts.DefaultPageSize".to_string(),
                setting_type: "Int".to_string(),
                default_value: Some("25".to_string()),
                description: None,
            }],
            events_published: vec!["ContactCreated".to_string()],
            events_subscribed: Vec::new(),
            dependencies: vec![Dependency {
                app: "Identity".to_string(),
                version_range: ">=1.0.0".to_string(),
            }],
        }
    }

    #[test]
    fn test_canonical_layout() {
        let json = to_canonical_json(&contacts_manifest());
        let expected = r#"{
  "name": "Contacts",
  "displayName": "Contacts",
  "version": "0.1.0",
  "description": "Address book",
  "permissions": [
    "Contacts.Read",
    "Contacts.Write"
  ],
  "routes": [
    {"method": "GET", "path": "/api/contacts", "requiredPermission": "Contacts.Read"}
  ],
  "settings": [
    {"key": "Contacts.DefaultPageSize", "type": "Int", "defaultValue": "25"}
  ],
  "eventsPublished": [
    "ContactCreated"
  ],
  "eventsSubscribed": [],
  "dependencies": [
    {"app": "Identity", "versionRange": ">=1.0.0"}
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_empty_collections_are_always_present() {
        let mut manifest = Manifest::new("Empty");
        manifest.apply_defaults();
        let json = to_canonical_json(&manifest);

        for key in [
            "\"permissions\": []",
            "\"routes\": []",
            "\"settings\": []",
            "\"eventsPublished\": []",
            "\"eventsSubscribed\": []",
            "\"dependencies\": []",
        ] {
            assert!(json.contains(key), "missing {} in {}", key, json);
        }
    }

    #[test]
    fn test_escaping() {
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote("line\nnext\r\tend"), r#""line\nnext\r\tend""#);
        assert_eq!(quote("café ✓"), "\"café ✓\"");
    }

    #[test]
    fn test_optional_fields_omitted() {
        let mut manifest = Manifest::new("Stock");
        manifest.routes.push(Route {
            method: "GET".to_string(),
            path: "/api/stock".to_string(),
            required_permission: Some(String::new()),
        });
        manifest.settings.push(Setting {
            key: "Stock.Threshold".to_string(),
            setting_type: "Int".to_string(),
            default_value: None,
            description: Some(String::new()),
        });
        let json = to_canonical_json(&manifest);

        assert!(json.contains(r#"{"method": "GET", "path": "/api/stock"}"#));
        assert!(json.contains(r#"{"key": "Stock.Threshold", "type": "Int"}"#));
        assert!(!json.contains("null"));
    }

    #[test]
    fn test_output_reads_back_through_serde() -> Result<(), crate::ManifestError> {
        let manifest = contacts_manifest();
        let parsed = Manifest::from_json(&to_canonical_json(&manifest))?;
        assert_eq!(parsed, manifest);
        Ok(())
    }

    #[test]
    fn test_rendering_is_stable() {
        let manifest = contacts_manifest();
        assert_eq!(to_canonical_json(&manifest), to_canonical_json(&manifest));
    }
}
