//! Makecache / removecache commands

use anyhow::{Context as _, Result};
use apm_core::{index_db_path, try_cache_dir};

use crate::exec::nix_search_all;
use crate::store::PackageIndex;
use crate::store::index::Removal;
use crate::ui::Output;

/// Rebuild the package index from `nix search`.
pub fn makecache() -> Result<()> {
    let out = Output::new();
    let cache_dir = try_cache_dir().context("could not determine home directory")?;

    out.section("Indexing");
    out.info("Querying nixpkgs; this can take a few minutes");
    let records = nix_search_all().context("could not list nixpkgs")?;
    let found = records.len();

    let path = index_db_path(&cache_dir);
    let (index, report) = PackageIndex::rebuild(&path, records)?;
    for failed in &report.errors {
        out.warning(&format!("{}: {}", failed.name, failed.error));
    }
    out.success(&format!("{} of {found} packages indexed", report.inserted));
    out.info(&format!("{} holds {} packages", path.display(), index.count()?));
    Ok(())
}

/// Delete the package index.
pub fn removecache() -> Result<()> {
    let out = Output::new();
    let cache_dir = try_cache_dir().context("could not determine home directory")?;
    match PackageIndex::remove(&index_db_path(&cache_dir))? {
        Removal::Removed => out.success("Package index removed"),
        Removal::NotExists => out.info("Package index did not exist"),
    }
    Ok(())
}
