//! Package removal from the flake tree.

use std::path::{Path, PathBuf};

use apm_core::EditError;
use apm_core::edit::block::remove_entry;
use apm_core::tree::scan_block;
use apm_schema::InstallationMethod;

use super::Context;

#[derive(Debug)]
pub enum RemoveOutcome {
    /// No file declares the package.
    NotInstalled { scan_errors: Vec<EditError> },
    Cancelled,
    Removed {
        /// Files that lost at least one entry.
        files: Vec<PathBuf>,
        /// Matching entries left alone because they share a line.
        shared: usize,
        errors: Vec<EditError>,
    },
}

/// Delete every entry declaring `name` from the method's blocks, after one
/// confirmation.
pub fn remove(ctx: &Context, name: &str, method: InstallationMethod) -> RemoveOutcome {
    let label = method.block_label();
    let scan = scan_block(&ctx.tree, label);
    let declaring: Vec<PathBuf> = scan
        .declaring(|entry| method.entry_declares(entry, name))
        .into_iter()
        .map(Path::to_path_buf)
        .collect();
    if declaring.is_empty() {
        return RemoveOutcome::NotInstalled {
            scan_errors: scan.errors,
        };
    }

    let question = format!(
        "Remove '{name}' ({method}) from {} file{}?",
        declaring.len(),
        if declaring.len() == 1 { "" } else { "s" }
    );
    if !ctx.prompter.confirm(&question) {
        return RemoveOutcome::Cancelled;
    }

    let mut files = Vec::new();
    let mut shared = 0;
    let mut errors = scan.errors;
    for path in declaring {
        match remove_entry(&path, label, |entry| method.entry_is(entry, name)) {
            Ok(outcome) => {
                if outcome.shared > 0 {
                    ctx.reporter.warning(&format!(
                        "{}: '{name}' shares a line with other content; left in place",
                        path.display()
                    ));
                }
                shared += outcome.shared;
                if outcome.removed > 0 {
                    ctx.reporter
                        .success(&format!("Removed '{name}' from {}", path.display()));
                    files.push(path);
                }
            }
            Err(e) if e.is_not_found() => {
                ctx.reporter.warning(&e.to_string());
                errors.push(e);
            }
            Err(e) => {
                ctx.reporter.error(&e.to_string());
                errors.push(e);
            }
        }
    }

    RemoveOutcome::Removed {
        files,
        shared,
        errors,
    }
}
