use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading manifests or resolving packages
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No {file_name} found in {start_dir} or any parent directory")]
    ManifestNotFound {
        file_name: String,
        start_dir: PathBuf,
    },

    #[error("Cannot find module '{name}' from '{base_dir}'")]
    PackageNotFound { name: String, base_dir: PathBuf },

    #[error("Invalid manifest: {0}")]
    Invalid(String),
}
