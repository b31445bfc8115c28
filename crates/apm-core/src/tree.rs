//! Enumeration of configuration files under a flake tree.

use std::path::{Path, PathBuf};

use apm_schema::CONFIG_EXTENSION;

use crate::edit::EditError;
use crate::edit::block::read_entries;

/// Every `.nix` file under `root`, sorted by path. Hidden directories
/// (`.git`, `.direnv`, ...) are skipped and symlinks are not followed.
pub fn config_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == CONFIG_EXTENSION)
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// A file that defines a block, with its current entries.
#[derive(Debug, Clone)]
pub struct BlockFile {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

/// Result of reading one block across a whole tree.
#[derive(Debug, Default)]
pub struct BlockScan {
    /// Files defining the block, in path order.
    pub files: Vec<BlockFile>,
    /// Files that could not be read. Files without the block are not errors.
    pub errors: Vec<EditError>,
}

impl BlockScan {
    /// Files whose block contains an entry accepted by `pred`.
    pub fn declaring(&self, pred: impl Fn(&str) -> bool) -> Vec<&Path> {
        self.files
            .iter()
            .filter(|f| f.entries.iter().any(|e| pred(e)))
            .map(|f| f.path.as_path())
            .collect()
    }
}

/// Read block `label` from every configuration file under `root`.
pub fn scan_block(root: &Path, label: &str) -> BlockScan {
    let mut scan = BlockScan::default();
    for path in config_files(root) {
        match read_entries(&path, label) {
            Ok(entries) => scan.files.push(BlockFile { path, entries }),
            Err(e) if e.is_not_found() => {
                tracing::trace!("{}: {e}", path.display());
            }
            Err(e) => {
                tracing::warn!("{e}");
                scan.errors.push(e);
            }
        }
    }
    tracing::debug!(
        "{} of tree {} define {label}",
        scan.files.len(),
        root.display()
    );
    scan
}
