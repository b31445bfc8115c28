//! Structural edits on configuration text.
//!
//! Both editors work the same way: read the whole file, locate a label and
//! its delimiters by scanning, compute the new whole-file content, and
//! replace the file in one rename. A lookup that cannot find its delimiters
//! never writes.

pub mod block;
pub mod section;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use block::{InsertOutcome, PresenceTest, RemoveOutcome};
pub use section::SectionOutcome;

#[derive(Error, Debug)]
pub enum EditError {
    /// The label is absent, or one of its delimiters is missing or unbalanced.
    /// Tree scans treat this as "this file does not define the block".
    #[error("'{label}' not found in {}: {reason}", path.display())]
    NotFound {
        path: PathBuf,
        label: String,
        reason: &'static str,
    },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EditError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(path: &Path, label: &str, miss: Miss) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
            label: label.to_string(),
            reason: miss.0,
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Why a pure lookup failed; turned into [`EditError::NotFound`] at the file layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Miss(pub &'static str);

pub(crate) fn read_file(path: &Path) -> Result<String, EditError> {
    fs::read_to_string(path).map_err(|e| EditError::io(path, e))
}

/// Replace `path` with `content` via a temp file in the same directory,
/// keeping the original permissions.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), EditError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| EditError::io(path, e))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| EditError::io(path, e))?;
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| EditError::io(path, e))?;
    }
    tmp.persist(path).map_err(|e| EditError::io(path, e.error))?;
    tracing::trace!("rewrote {}", path.display());
    Ok(())
}

/// Code part of a line: everything before the first `#`.
pub(crate) fn strip_comment(line: &str) -> &str {
    line.find('#').map_or(line, |idx| &line[..idx])
}

/// Leading whitespace of a line.
pub(crate) fn indent_of(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
