//! Generator settings read from `modmeta.toml`
//!
//! The file lives next to the consumer crate's `Cargo.toml`. Every field has
//! a default, so a missing file or an empty table is a valid configuration:
//!
//! ```toml
//! source_dirs = ["src"]
//! index_file = "modmeta_manifests.rs"
//! namespace = "modmeta_generated"
//! name_conflict = "positional-wins"
//! verbosity = 0
//! cargo_warnings = true
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the consumer crate root
pub const CONFIG_FILE_NAME: &str = "modmeta.toml";

/// Default name of the generated index unit
pub const DEFAULT_INDEX_FILE: &str = "modmeta_manifests.rs";

/// Default generated namespace (Rust module name)
pub const DEFAULT_NAMESPACE: &str = "modmeta_generated";

/// Error type for configuration loading
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// The configuration file exists but could not be read
    Read(PathBuf, String),
    /// The configuration file is not valid TOML for [`GeneratorConfig`]
    Parse(PathBuf, String),
    /// A value parsed but is not usable
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read(path, msg) => {
                write!(f, "Failed to read {}: {}", path.display(), msg)
            }
            ConfigError::Parse(path, msg) => {
                write!(f, "Failed to parse {}: {}", path.display(), msg)
            }
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// How to resolve a module name given both as a named and a positional argument
///
/// Positional arguments are applied after named ones, so the positional name
/// wins unless the policy says otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameConflictPolicy {
    /// Positional name silently overrides the named one
    #[default]
    PositionalWins,
    /// Positional name wins and a warning is logged when they differ
    Warn,
    /// The manifest is discarded when they differ
    Reject,
}

/// Settings for one generator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Source roots scanned for declared types, relative to the crate root
    pub source_dirs: Vec<PathBuf>,
    /// Name of the index unit written into `OUT_DIR`
    pub index_file: String,
    /// Module that wraps every generated constant
    pub namespace: String,
    pub name_conflict: NameConflictPolicy,
    /// 0 = info to log file only, 1 = debug, 2 = trace
    pub verbosity: u8,
    /// Forward warnings to cargo as `cargo:warning=` lines
    pub cargo_warnings: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            source_dirs: vec![PathBuf::from("src")],
            index_file: DEFAULT_INDEX_FILE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            name_conflict: NameConflictPolicy::default(),
            verbosity: 0,
            cargo_warnings: true,
        }
    }
}

impl GeneratorConfig {
    /// Load `modmeta.toml` from `crate_root`, falling back to defaults when absent
    pub fn load(crate_root: &Path) -> Result<Self, ConfigError> {
        let path = crate_root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(GeneratorConfig::default());
        }
        Self::load_from_path(&path)
    }

    /// Load and validate a configuration file at an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e.to_string()))?;
        let config: GeneratorConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dirs.is_empty() {
            return Err(ConfigError::Invalid(
                "source_dirs must list at least one directory".to_string(),
            ));
        }
        if !is_identifier(&self.namespace) {
            return Err(ConfigError::Invalid(format!(
                "namespace '{}' is not a valid Rust identifier",
                self.namespace
            )));
        }
        if self.index_file.trim().is_empty() || self.index_file.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "index_file '{}' must be a plain file name",
                self.index_file
            )));
        }
        Ok(())
    }

    /// Source roots resolved against the crate root
    pub fn resolved_source_dirs(&self, crate_root: &Path) -> Vec<PathBuf> {
        self.source_dirs
            .iter()
            .map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    crate_root.join(dir)
                }
            })
            .collect()
    }
}

/// Whether `value` can name the generated module
///
/// syn rejects keywords (`mod`, `fn`, `self`) and `_`; raw identifiers such
/// as `r#mod` are accepted.
fn is_identifier(value: &str) -> bool {
    syn::parse_str::<syn::Ident>(value).is_ok()
}
