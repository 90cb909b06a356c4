// Registry - Record of packs installed into a repository
//
// Persisted as pretty-printed JSON at .agent/promptkit/registry.json so it
// stays readable in diffs. The registry is a history cache, not a source of
// truth: an unreadable file is treated as "nothing installed".

use crate::config::REGISTRY_PATH;
use crate::error::{PromptkitError, Result};
use crate::packs::materialize::FileStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where an installed pack came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Builtin,
    External,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Builtin => write!(f, "builtin"),
            Provenance::External => write!(f, "external"),
        }
    }
}

/// Outcome for a single file of an installation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileRecord {
    pub target: String,
    pub status: FileStatus,
}

/// One installed pack
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstalledPack {
    pub name: String,
    pub version: String,
    pub source: Provenance,
    pub installed_at: DateTime<Utc>,
    /// Snippet text captured at install time
    pub agents_snippet: String,
    pub files: Vec<FileRecord>,
}

/// Installed packs, most recently installed last
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Registry {
    pub packs: Vec<InstalledPack>,
}

impl Registry {
    /// Registry file location for a repository
    pub fn path(repo_root: &Path) -> PathBuf {
        repo_root.join(REGISTRY_PATH)
    }

    /// Load the registry, resetting to empty when the file is missing or corrupt
    pub fn load(repo_root: &Path) -> Self {
        match Self::try_load(repo_root) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::warn!("{}; treating registry as empty", e);
                Registry::default()
            }
        }
    }

    /// Strict load. A missing file is an empty registry; anything unreadable is an error.
    pub fn try_load(repo_root: &Path) -> Result<Self> {
        let path = Self::path(repo_root);
        if !path.exists() {
            return Ok(Registry::default());
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| PromptkitError::RegistryCorrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        serde_json::from_str(&content).map_err(|e| PromptkitError::RegistryCorrupt {
            path,
            reason: e.to_string(),
        })
    }

    /// Save to disk, creating `.agent/promptkit/` as needed
    pub fn save(&self, repo_root: &Path) -> Result<()> {
        let path = Self::path(repo_root);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PromptkitError::FileWrite {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|source| PromptkitError::FileWrite {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), packs = self.packs.len(), "saved registry");
        Ok(())
    }

    /// Insert a record, replacing any earlier record with the same name.
    /// The new record always lands at the end.
    pub fn upsert(&mut self, pack: InstalledPack) {
        self.packs.retain(|p| p.name != pack.name);
        self.packs.push(pack);
    }

    /// Stored snippets in registry order
    pub fn snippets(&self) -> Vec<&str> {
        self.packs.iter().map(|p| p.agents_snippet.as_str()).collect()
    }

    pub fn list(&self) -> &[InstalledPack] {
        &self.packs
    }
}
