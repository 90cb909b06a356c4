// File materialization - copy pack templates into the target repository

use crate::error::{PromptkitError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happened to a destination file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Created,
    Overwritten,
    Unchanged,
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Created => write!(f, "created"),
            FileStatus::Overwritten => write!(f, "overwritten"),
            FileStatus::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Write `content` to `dest`. Existing files are left alone unless `overwrite` is set.
pub fn write_file(dest: &Path, content: &str, overwrite: bool) -> Result<FileStatus> {
    let existed = dest.exists();
    if existed && !overwrite {
        tracing::debug!(path = %dest.display(), "exists, leaving unchanged");
        return Ok(FileStatus::Unchanged);
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PromptkitError::FileWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(dest, content).map_err(|source| PromptkitError::FileWrite {
        path: dest.to_path_buf(),
        source,
    })?;

    Ok(if existed {
        FileStatus::Overwritten
    } else {
        FileStatus::Created
    })
}
