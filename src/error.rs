use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pack not found: {0}")]
    PackNotFound(String),

    #[error("Invalid pack manifest {}: {reason}", path.display())]
    InvalidManifest { path: PathBuf, reason: String },

    #[error("Corrupt registry {}: {reason}", path.display())]
    RegistryCorrupt { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid repository path: {0}")]
    RepoPath(String),
}

pub type Result<T> = std::result::Result<T, PromptkitError>;
