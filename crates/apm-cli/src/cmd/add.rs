//! Add command

use anyhow::{Context as _, Result, bail};
use apm_core::flathub::Flathub;
use apm_core::remote::http_client;
use apm_core::{index_db_path, try_cache_dir};
use apm_schema::InstallationMethod;

use crate::ops::Context;
use crate::ops::install::{FlathubSource, InstallOutcome, InstallRequest, LocalIndex, install};
use crate::store::PackageIndex;
use crate::ui::Output;
use crate::ui::list::record_row;

/// Add a package to the flake tree.
#[allow(clippy::fn_params_excessive_bools)]
pub async fn add(
    name: &str,
    method: InstallationMethod,
    unstable: bool,
    exact: bool,
    yes: bool,
    flathub_url: &str,
) -> Result<()> {
    let ctx = Context::load(yes)?;
    let out = Output::new();
    let req = InstallRequest {
        name: name.to_string(),
        method,
        unstable,
        exact,
    };

    let outcome = if method.uses_local_index() {
        let cache_dir = try_cache_dir().context("could not determine home directory")?;
        let index = PackageIndex::open(&index_db_path(&cache_dir))?;
        install(&ctx, &LocalIndex(&index), &req).await?
    } else {
        let flathub = Flathub::new(http_client()?, flathub_url);
        install(&ctx, &FlathubSource(&flathub), &req).await?
    };

    match outcome {
        InstallOutcome::NotFound { name, suggestions } => {
            if !suggestions.is_empty() {
                out.info("Did you mean:");
                for record in &suggestions {
                    out.plain(&record_row(out.theme(), record));
                }
            }
            bail!("package '{name}' not found");
        }
        InstallOutcome::AlreadyInstalled { name, files } => {
            for file in &files {
                out.info(&format!("'{name}' is already declared in {}", file.display()));
            }
        }
        InstallOutcome::Cancelled => out.warning("Cancelled; no files changed"),
        InstallOutcome::Modified {
            entry,
            files,
            errors,
        } => {
            for e in &errors {
                out.warning(&e.to_string());
            }
            let plural = if files.len() == 1 { "" } else { "s" };
            out.success(&format!("{entry} added to {} file{plural}", files.len()));
            out.info("Run 'apm rebuild-system' to apply");
        }
        InstallOutcome::NoBlockFiles { errors } => {
            for e in &errors {
                out.warning(&e.to_string());
            }
            bail!("no file in {} defines {}", ctx.tree.display(), method.block_label());
        }
        InstallOutcome::AlreadyPresentEverywhere { entry, errors } => {
            for e in &errors {
                out.warning(&e.to_string());
            }
            out.info(&format!("{entry} is already present in every package file"));
        }
    }
    Ok(())
}
