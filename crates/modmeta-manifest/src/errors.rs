use thiserror::Error;

/// Errors that can occur while reading manifest documents
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}
