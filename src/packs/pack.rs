// Prompt Pack - File templates plus an AGENTS.md snippet
//
// A pack is a directory under the pack storage root holding a pack.json
// manifest, the template files it declares, and its snippet file.

use crate::agents_md::{END_MARKER, START_MARKER};
use crate::config::MANIFEST_FILE;
use crate::error::{PromptkitError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A pack definition as read from `pack.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub files: Vec<PackFile>,
    /// Snippet source, relative to the pack directory
    pub agents_entry: String,
    /// Directory the manifest was loaded from
    #[serde(skip)]
    pub root: PathBuf,
}

/// One template copied into the target repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackFile {
    /// Location within the pack
    pub source: String,
    /// Destination relative to the repository root
    pub target: String,
}

/// Read-only view over the pack storage root
#[derive(Debug, Clone)]
pub struct PackStore {
    packs_dir: PathBuf,
}

impl Pack {
    /// Load a pack manifest from `<pack_dir>/pack.json`
    pub fn load(pack_dir: &Path) -> Result<Self> {
        let manifest_path = pack_dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&manifest_path).map_err(|source| {
            PromptkitError::FileRead {
                path: manifest_path.clone(),
                source,
            }
        })?;

        let mut pack: Pack =
            serde_json::from_str(&content).map_err(|e| PromptkitError::InvalidManifest {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;

        pack.validate().map_err(|reason| PromptkitError::InvalidManifest {
            path: manifest_path,
            reason,
        })?;

        pack.root = pack_dir.to_path_buf();
        Ok(pack)
    }

    /// Validate manifest fields
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("pack name cannot be empty".into());
        }

        if self.version.is_empty() {
            return Err("pack version cannot be empty".into());
        }

        // Basic semantic version check
        if !self.version.contains('.') {
            return Err(format!(
                "invalid version format: {}. Expected semantic version (e.g., 1.0.0)",
                self.version
            ));
        }

        if self.agents_entry.is_empty() {
            return Err("agents_entry cannot be empty".into());
        }

        for file in &self.files {
            if file.source.is_empty() || file.target.is_empty() {
                return Err("file entries need both source and target".into());
            }
            if !is_contained(Path::new(&file.target)) {
                return Err(format!(
                    "target must stay inside the repository: {}",
                    file.target
                ));
            }
        }

        Ok(())
    }

    /// Absolute path of a file declared by this pack
    pub fn source_path(&self, file: &PackFile) -> PathBuf {
        self.root.join(&file.source)
    }

    /// Absolute path of the snippet source
    pub fn snippet_path(&self) -> PathBuf {
        self.root.join(&self.agents_entry)
    }

    /// Read the snippet, trimmed and newline-terminated.
    /// Snippets may not carry the managed block markers.
    pub fn read_snippet(&self) -> Result<String> {
        let path = self.snippet_path();
        let raw = std::fs::read_to_string(&path).map_err(|source| PromptkitError::FileRead {
            path: path.clone(),
            source,
        })?;

        if raw.contains(START_MARKER) || raw.contains(END_MARKER) {
            return Err(PromptkitError::InvalidManifest {
                path,
                reason: "snippet contains a promptkit block marker".into(),
            });
        }

        Ok(format!("{}\n", raw.trim()))
    }
}

/// Relative path without `..`, root, or prefix components
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl PackStore {
    pub fn new(packs_dir: &Path) -> Self {
        Self {
            packs_dir: packs_dir.to_path_buf(),
        }
    }

    /// Look up a pack by directory name. Read fresh on every call.
    pub fn resolve(&self, name: &str) -> Result<Pack> {
        if name.is_empty() || !is_contained(Path::new(name)) || name.contains(['/', '\\']) {
            return Err(PromptkitError::PackNotFound(name.to_string()));
        }

        let pack_dir = self.packs_dir.join(name);
        if !pack_dir.join(MANIFEST_FILE).is_file() {
            return Err(PromptkitError::PackNotFound(name.to_string()));
        }

        Pack::load(&pack_dir)
    }

    /// All packs directly under the storage root, sorted by name.
    /// Entries without a manifest are skipped; broken manifests are logged and skipped.
    pub fn list_available(&self) -> Result<Vec<Pack>> {
        if !self.packs_dir.exists() {
            tracing::debug!(dir = %self.packs_dir.display(), "pack directory missing");
            return Ok(Vec::new());
        }

        let mut packs = Vec::new();

        for entry in std::fs::read_dir(&self.packs_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !path.is_dir() || !path.join(MANIFEST_FILE).is_file() {
                continue;
            }

            match Pack::load(&path) {
                Ok(pack) => packs.push(pack),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping pack: {}", e);
                }
            }
        }

        packs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(packs)
    }
}
