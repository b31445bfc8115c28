//! List command

use anyhow::Result;
use apm_core::tree::scan_block;
use apm_schema::InstallationMethod;

use crate::ops::context::load_tree;
use crate::ui::Output;
use crate::ui::list::{entry_row, footer};

/// List the entries declared for `method` across the tree.
pub fn list(method: InstallationMethod) -> Result<()> {
    let tree = load_tree()?;
    let out = Output::new();
    let label = method.block_label();
    let scan = scan_block(&tree, label);

    for e in &scan.errors {
        out.warning(&e.to_string());
    }
    if scan.files.is_empty() {
        out.info(&format!("No file in {} defines {label}", tree.display()));
        return Ok(());
    }

    let mut count = 0;
    for file in &scan.files {
        let shown = file.path.strip_prefix(&tree).unwrap_or(&file.path);
        for entry in &file.entries {
            out.plain(&entry_row(out.theme(), entry, &shown.display().to_string()));
            count += 1;
        }
    }
    out.plain("");
    out.plain(&footer(count, "package"));
    Ok(())
}
