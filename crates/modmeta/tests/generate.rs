//! Integration tests running the generator against the fixture crate

use modmeta::{GenerationReport, Generator, GeneratorError};
use modmeta_config::{GeneratorConfig, NameConflictPolicy};
use modmeta_manifest::{Manifest, Route};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CONTACTS_JSON: &str = r#"{
  "name": "Contacts",
  "displayName": "Contacts",
  "version": "1.0.0",
  "description": "Address book",
  "permissions": [
    "Contacts.Read",
    "Contacts.Write"
  ],
  "routes": [
    {"method": "GET", "path": "/api/contacts/export", "requiredPermission": "Contacts.Read"},
    {"method": "GET", "path": "/api/Contacts", "requiredPermission": "Contacts.Read"},
    {"method": "POST", "path": "/api/Contacts", "requiredPermission": "Contacts.Write"}
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

fn fixture_crate() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("contacts")
}

fn fixture_generator(out_dir: &Path) -> Result<Generator, GeneratorError> {
    let crate_root = fixture_crate();
    let config = GeneratorConfig::load(&crate_root)?;
    Ok(Generator::new(config, crate_root, out_dir.to_path_buf()))
}

fn run_fixture(out_dir: &Path) -> Result<GenerationReport, GeneratorError> {
    fixture_generator(out_dir)?.run()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}

/// Pull the raw string payload back out of a generated unit
fn unit_json(unit: &str) -> &str {
    let start = unit.find("r#\"").map(|i| i + 3).unwrap_or(0);
    let end = unit.rfind("\"#;").unwrap_or(unit.len());
    &unit[start..end]
}

#[test]
fn test_fixture_config_is_loaded() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    let generator = fixture_generator(out.path())?;
    assert_eq!(generator.config().namespace, "contacts_generated");
    assert_eq!(generator.config().name_conflict, NameConflictPolicy::Warn);
    assert_eq!(generator.out_dir(), out.path());
    Ok(())
}

#[test]
fn test_contacts_scenario() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    let report = run_fixture(out.path())?;

    assert_eq!(report.files_scanned, 5);
    assert_eq!(report.modules, vec!["Contacts", "Inventory"]);
    assert_eq!(report.units_written, 2);
    assert!(report.discards.is_empty());

    let contacts = read(&out.path().join("Manifest_Contacts.rs"));
    assert!(contacts.contains("pub const Manifest_Contacts: &str = r#\""));
    assert_eq!(unit_json(&contacts), CONTACTS_JSON);
    Ok(())
}

#[test]
fn test_unanchored_controller_gets_synthesized_manifest() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    run_fixture(out.path())?;

    let unit = read(&out.path().join("Manifest_Inventory.rs"));
    let Ok(manifest) = Manifest::from_json(unit_json(&unit)) else {
        panic!("synthesized unit is not a manifest: {}", unit);
    };
    assert_eq!(manifest.display_name, "Inventory");
    assert_eq!(manifest.version, "0.1.0");
    assert_eq!(manifest.description, "Auto-generated manifest for Inventory");
    assert_eq!(
        manifest.routes,
        vec![Route::new(
            "POST",
            "/api/stock/adjust",
            Some("Inventory.Write")
        )]
    );
    Ok(())
}

#[test]
fn test_index_lists_every_unit() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    let report = run_fixture(out.path())?;

    assert_eq!(report.index_path, out.path().join("modmeta_manifests.rs"));
    let index = read(&report.index_path);
    assert!(index.contains("pub mod contacts_generated {"));
    assert!(index.contains("\"/Manifest_Contacts.rs\""));
    assert!(index.contains("(\"Contacts\", Manifest_Contacts),"));
    assert!(index.contains("(\"Inventory\", Manifest_Inventory),"));
    Ok(())
}

#[test]
fn test_second_run_is_idempotent() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    run_fixture(out.path())?;
    let first = read(&out.path().join("Manifest_Contacts.rs"));

    let report = run_fixture(out.path())?;
    assert_eq!(report.units_written, 0);
    assert_eq!(report.units_unchanged, 2);
    assert_eq!(read(&out.path().join("Manifest_Contacts.rs")), first);
    Ok(())
}

#[test]
fn test_stale_units_are_removed() -> Result<(), GeneratorError> {
    let Ok(out) = TempDir::new() else {
        return Ok(());
    };
    let stale = out.path().join("Manifest_Retired.rs");
    assert!(fs::write(&stale, "pub const Manifest_Retired: &str = \"\";").is_ok());

    let report = run_fixture(out.path())?;
    assert_eq!(report.stale_units_removed, 1);
    assert!(!stale.exists());
    Ok(())
}

#[test]
fn test_crate_without_annotations_writes_empty_index() -> Result<(), GeneratorError> {
    let (Ok(root), Ok(out)) = (TempDir::new(), TempDir::new()) else {
        return Ok(());
    };
    let src = root.path().join("src");
    assert!(fs::create_dir_all(&src).is_ok());
    assert!(fs::write(src.join("lib.rs"), "pub struct Plain;\n").is_ok());

    let generator = Generator::new(
        GeneratorConfig::default(),
        root.path().to_path_buf(),
        out.path().to_path_buf(),
    );
    let report = generator.run()?;

    assert!(report.modules.is_empty());
    assert_eq!(report.types_scanned, 1);
    let index = read(&report.index_path);
    assert!(index.contains("pub mod modmeta_generated {"));
    assert!(index.contains("pub const ALL: &[(&str, &str)] = &[\n    ];"));
    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() {
    let Ok(out) = TempDir::new() else {
        return;
    };
    let config = GeneratorConfig {
        namespace: "not an identifier".to_string(),
        ..GeneratorConfig::default()
    };
    let generator = Generator::new(config, fixture_crate(), out.path().to_path_buf());
    assert!(matches!(generator.run(), Err(GeneratorError::Config(_))));
}
