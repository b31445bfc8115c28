//! Remove command

use anyhow::{Result, bail};
use apm_schema::InstallationMethod;

use crate::ops::Context;
use crate::ops::remove::{RemoveOutcome, remove as remove_from_tree};
use crate::ui::Output;

/// Remove a package from the flake tree.
pub fn remove(name: &str, method: InstallationMethod, yes: bool) -> Result<()> {
    let ctx = Context::load(yes)?;
    let out = Output::new();

    match remove_from_tree(&ctx, name, method) {
        RemoveOutcome::NotInstalled { scan_errors } => {
            for e in &scan_errors {
                out.warning(&e.to_string());
            }
            bail!("'{name}' is not declared in {}", method.block_label());
        }
        RemoveOutcome::Cancelled => out.warning("Cancelled; no files changed"),
        RemoveOutcome::Removed {
            files,
            shared,
            errors,
        } => {
            for e in &errors {
                out.warning(&e.to_string());
            }
            if shared > 0 {
                out.warning(&format!(
                    "{shared} entr{} left in place; edit {} by hand",
                    if shared == 1 { "y" } else { "ies" },
                    if shared == 1 { "it" } else { "them" }
                ));
            }
            if !files.is_empty() {
                let plural = if files.len() == 1 { "" } else { "s" };
                out.success(&format!("'{name}' removed from {} file{plural}", files.len()));
                out.info("Run 'apm rebuild-system' to apply");
            }
        }
    }
    Ok(())
}
