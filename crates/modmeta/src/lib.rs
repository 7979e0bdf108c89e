//! Build-time module manifest generation
//!
//! Call from a consumer crate's `build.rs`:
//!
//! ```no_run
//! fn main() {
//!     if let Err(e) = modmeta::Generator::from_build_env().and_then(|g| g.run()) {
//!         panic!("modmeta generation failed: {e}");
//!     }
//! }
//! ```
//!
//! and include the index from the crate:
//!
//! ```ignore
//! include!(concat!(env!("OUT_DIR"), "/modmeta_manifests.rs"));
//!
//! for (name, json) in modmeta_generated::ALL { /* ... */ }
//! ```
//!
//! The source tree is scanned for `#[module]` anchors and
//! `#[belongs_to_module]` controllers; every resulting manifest is written as
//! canonical JSON into its own unit under `OUT_DIR`.

pub mod emit;
pub mod errors;

use modmeta_ast::{Discard, ManifestDiscovery, ScannedFile, SymbolScanner};
use modmeta_config::{GeneratorConfig, CONFIG_FILE_NAME};
use modmeta_logger as logger;
use rayon::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

pub use emit::GeneratedUnit;
pub use errors::GeneratorError;

/// Directories never descended into while collecting sources
const IGNORED_DIRS: &[&str] = &["target", ".git"];

/// Summary of one generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub files_scanned: usize,
    pub types_scanned: usize,
    /// Module names in emission order
    pub modules: Vec<String>,
    pub units_written: usize,
    pub units_unchanged: usize,
    pub stale_units_removed: usize,
    pub discards: Vec<Discard>,
    pub index_path: PathBuf,
}

/// Manifest generator for one crate
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    crate_root: PathBuf,
    out_dir: PathBuf,
    cargo_directives: bool,
}

impl Generator {
    /// Generator configured from the environment Cargo gives build scripts
    ///
    /// Reads `CARGO_MANIFEST_DIR` and `OUT_DIR` and loads `modmeta.toml` from
    /// the crate root when present. `cargo:rerun-if-changed` directives are
    /// printed during [`Generator::run`].
    pub fn from_build_env() -> Result<Self, GeneratorError> {
        let crate_root = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .ok_or(GeneratorError::MissingEnv("CARGO_MANIFEST_DIR"))?;
        let out_dir = env::var_os("OUT_DIR")
            .map(PathBuf::from)
            .ok_or(GeneratorError::MissingEnv("OUT_DIR"))?;

        let config = GeneratorConfig::load(&crate_root)?;
        let mut generator = Generator::new(config, crate_root, out_dir);
        generator.cargo_directives = true;
        Ok(generator)
    }

    pub fn new(config: GeneratorConfig, crate_root: PathBuf, out_dir: PathBuf) -> Self {
        Generator {
            config,
            crate_root,
            out_dir,
            cargo_directives: false,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Scan, discover and write every unit plus the index
    pub fn run(&self) -> Result<GenerationReport, GeneratorError> {
        let start_time = std::time::Instant::now();
        self.config.validate()?;

        fs::create_dir_all(&self.out_dir).map_err(|e| GeneratorError::io(&self.out_dir, e))?;
        if let Err(e) = logger::init_with_verbosity(
            self.config.verbosity,
            &self.out_dir,
            self.config.cargo_warnings,
        ) {
            // logging is best effort; generation goes on without a log file
            tracing::warn!("Logger unavailable: {}", e);
        }
        logger::info(&format!(
            "modmeta generation started for {}",
            self.crate_root.display()
        ));

        let source_dirs = self.config.resolved_source_dirs(&self.crate_root);
        self.emit_rerun_directives(&source_dirs);

        let files = collect_source_files(&source_dirs);
        logger::debug(&format!("Collected {} source files", files.len()));

        // rayon keeps input order on collect, so scan order is the walk order
        let scanned: Vec<ScannedFile> = files
            .par_iter()
            .filter_map(|path| {
                let label = self.source_label(path);
                match SymbolScanner::scan_path(path, &label) {
                    Ok(file) => Some(file),
                    Err(e) => {
                        logger::warn(&format!("Skipping {}: {:#}", label, e));
                        None
                    }
                }
            })
            .collect();
        let files_scanned = scanned.len();

        let discovery = ManifestDiscovery::new(self.config.name_conflict).discover(scanned);
        for discard in &discovery.discards {
            logger::debug(&format!("Discarded on {}: {}", discard.owner, discard.reason));
        }

        let units = emit::plan_units(&discovery.manifests);
        let mut report = GenerationReport {
            files_scanned,
            types_scanned: discovery.types_scanned,
            modules: units.iter().map(|u| u.module_name.clone()).collect(),
            discards: discovery.discards,
            ..Default::default()
        };

        for unit in &units {
            let path = self.out_dir.join(&unit.file_name);
            if write_if_changed(&path, &unit.contents)? {
                logger::step(&format!("Wrote {}", unit.file_name));
                report.units_written += 1;
            } else {
                report.units_unchanged += 1;
            }
        }
        report.stale_units_removed = self.remove_stale_units(&units)?;

        let index_path = self.out_dir.join(&self.config.index_file);
        write_if_changed(
            &index_path,
            &emit::render_index(&self.config.namespace, &units),
        )?;
        report.index_path = index_path;

        logger::info(&format!(
            "Generated {} manifests ({} written, {} unchanged) from {} files in {:.2}ms",
            units.len(),
            report.units_written,
            report.units_unchanged,
            report.files_scanned,
            start_time.elapsed().as_secs_f64() * 1000.0
        ));
        Ok(report)
    }

    fn source_label(&self, path: &Path) -> String {
        path.strip_prefix(&self.crate_root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn emit_rerun_directives(&self, source_dirs: &[PathBuf]) {
        if !self.cargo_directives {
            return;
        }
        println!(
            "cargo:rerun-if-changed={}",
            self.crate_root.join(CONFIG_FILE_NAME).display()
        );
        for dir in source_dirs {
            println!("cargo:rerun-if-changed={}", dir.display());
        }
    }

    /// Delete unit files from earlier runs whose module no longer exists
    fn remove_stale_units(&self, units: &[GeneratedUnit]) -> Result<usize, GeneratorError> {
        let entries = fs::read_dir(&self.out_dir).map_err(|e| GeneratorError::io(&self.out_dir, e))?;

        let mut removed = 0;
        for entry in entries.filter_map(Result::ok) {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let is_unit = file_name.starts_with(emit::UNIT_PREFIX) && file_name.ends_with(".rs");
            if !is_unit
                || file_name == self.config.index_file
                || units.iter().any(|u| u.file_name == file_name)
            {
                continue;
            }
            let path = entry.path();
            fs::remove_file(&path).map_err(|e| GeneratorError::io(&path, e))?;
            logger::debug(&format!("Removed stale unit {}", file_name));
            removed += 1;
        }
        Ok(removed)
    }
}

/// Sorted `.rs` files under every source directory, in directory order
fn collect_source_files(source_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in source_dirs {
        if !dir.is_dir() {
            logger::warn(&format!("Source directory {} does not exist", dir.display()));
            continue;
        }
        files.extend(
            WalkDir::new(dir)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(|entry| !is_ignored_dir(entry))
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
                .map(|e| e.into_path()),
        );
    }
    files
}

fn is_ignored_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || IGNORED_DIRS.contains(&name))
}

/// Write `contents` unless the file already holds exactly that text
///
/// Returns whether the file was written.
fn write_if_changed(path: &Path, contents: &str) -> Result<bool, GeneratorError> {
    if fs::read_to_string(path).is_ok_and(|existing| existing == contents) {
        return Ok(false);
    }
    fs::write(path, contents).map_err(|e| {
        logger::error(&format!("Failed to write {}: {}", path.display(), e));
        GeneratorError::io(path, e)
    })?;
    Ok(true)
}
