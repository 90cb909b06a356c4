use std::path::{Path, PathBuf};

use crate::error::{PromptkitError, Result};

/// Registry location, relative to the target repository root
pub const REGISTRY_PATH: &str = ".agent/promptkit/registry.json";
/// Document that receives the managed block
pub const AGENTS_FILE: &str = "AGENTS.md";
/// Manifest file every pack directory must contain
pub const MANIFEST_FILE: &str = "pack.json";
/// Environment override for the pack storage root
pub const PACKS_DIR_ENV: &str = "PROMPTKIT_PACKS_DIR";

#[derive(Debug, Clone)]
pub struct Config {
    /// Repository that packs are installed into
    pub repo_root: PathBuf,
    /// Directory holding one subdirectory per pack
    pub packs_dir: PathBuf,
}

impl Config {
    pub fn load(path: Option<&Path>, packs_dir: Option<PathBuf>) -> Result<Self> {
        let requested = path.unwrap_or_else(|| Path::new("."));

        if !requested.exists() {
            return Err(PromptkitError::RepoPath(format!(
                "path does not exist: {}",
                requested.display()
            )));
        }
        if !requested.is_dir() {
            return Err(PromptkitError::RepoPath(format!(
                "path is not a directory: {}",
                requested.display()
            )));
        }

        let repo_root = requested.canonicalize()?;
        let packs_dir = packs_dir.unwrap_or_else(builtin_packs_dir);

        tracing::debug!(
            repo_root = %repo_root.display(),
            packs_dir = %packs_dir.display(),
            "resolved configuration"
        );

        Ok(Config {
            repo_root,
            packs_dir,
        })
    }
}

/// Packs shipped alongside the crate
pub fn builtin_packs_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("packs")
}
