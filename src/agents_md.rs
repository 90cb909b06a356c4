// Managed Block - The promptkit section of AGENTS.md
//
// The block sits between START_MARKER and END_MARKER and is rebuilt from the
// full snippet list on every install. Text outside the markers is left alone
// apart from whitespace at the seams. Markers only count as whole lines.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PromptkitError, Result};

pub const START_MARKER: &str = "<!-- promptkit:start -->";
pub const END_MARKER: &str = "<!-- promptkit:end -->";
pub const HEADING: &str = "# Prompt Packs (managed by promptkit)";

/// What happened to the target document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    Created,
    Updated,
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockStatus::Created => write!(f, "created"),
            BlockStatus::Updated => write!(f, "updated"),
        }
    }
}

/// Build the managed block: markers, heading, then snippets separated by blank lines.
/// Snippets that are empty after trimming are dropped.
pub fn render_block<S: AsRef<str>>(snippets: &[S]) -> String {
    let body = snippets
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{START_MARKER}\n{HEADING}\n\n{body}\n{END_MARKER}\n")
}

/// Byte range of the first start marker line through the first end marker line after it.
/// Returns None unless both are present in that order.
pub fn locate_block(content: &str) -> Option<(usize, usize)> {
    let start = find_marker_line(content, START_MARKER, 0)?;
    let next_line = start + content[start..].find('\n')? + 1;
    let end = find_marker_line(content, END_MARKER, next_line)? + END_MARKER.len();
    Some((start, end))
}

/// Offset of the first line at or after `from` that is exactly `marker`
fn find_marker_line(content: &str, marker: &str, from: usize) -> Option<usize> {
    let mut offset = from;
    for line in content[from..].split_inclusive('\n') {
        if line.trim_end() == marker {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Pure merge of the managed block into an optional existing document
pub fn merge_document<S: AsRef<str>>(
    existing: Option<&str>,
    snippets: &[S],
) -> (String, BlockStatus) {
    let block = render_block(snippets);

    let Some(content) = existing else {
        return (block, BlockStatus::Created);
    };

    let merged = match locate_block(content) {
        Some((start, end)) => {
            let before = content[..start].trim_end();
            let after = content[end..].trim_start();

            let mut out = String::with_capacity(content.len() + block.len());
            if !before.is_empty() {
                out.push_str(before);
                out.push_str("\n\n");
            }
            out.push_str(&block);
            out.push_str(after);
            out
        }
        None => {
            // Missing or out-of-order markers: append a fresh block
            let mut out = content.trim_end().to_string();
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(&block);
            out
        }
    };

    (merged, BlockStatus::Updated)
}

/// Rewrite the managed block in the document at `path`, creating the file if needed
pub fn upsert_block<S: AsRef<str>>(path: &Path, snippets: &[S]) -> Result<BlockStatus> {
    let existing = if path.exists() {
        Some(
            std::fs::read_to_string(path).map_err(|source| PromptkitError::FileRead {
                path: path.to_path_buf(),
                source,
            })?,
        )
    } else {
        None
    };

    let (content, status) = merge_document(existing.as_deref(), snippets);

    std::fs::write(path, content).map_err(|source| PromptkitError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        %status,
        snippets = snippets.len(),
        "managed block written"
    );
    Ok(status)
}
