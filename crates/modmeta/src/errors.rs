//! Errors surfaced to the build script
//!
//! Annotation problems never end up here; they are recorded as discards.
//! Only the environment and the filesystem can fail a generation run.

use modmeta_config::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment variable {0} is not set; run the generator from a build script")]
    MissingEnv(&'static str),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}
