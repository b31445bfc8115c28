//! Search command

use anyhow::{Context as _, Result};
use apm_core::flathub::{AppDirectory, Flathub};
use apm_core::remote::http_client;
use apm_core::{index_db_path, try_cache_dir};
use apm_schema::InstallationMethod;

use crate::store::PackageIndex;
use crate::ui::Output;
use crate::ui::list::{footer, record_row};

/// Search the local index, or Flathub for `--flatpak`.
pub async fn search(query: &str, method: InstallationMethod, flathub_url: &str) -> Result<()> {
    let out = Output::new();
    let results = if method.uses_local_index() {
        let cache_dir = try_cache_dir().context("could not determine home directory")?;
        PackageIndex::open(&index_db_path(&cache_dir))?.search(query)?
    } else {
        Flathub::new(http_client()?, flathub_url)
            .search(query)
            .await
            .context("Flathub search failed")?
    };

    if results.is_empty() {
        out.info(&format!("No packages found matching '{query}'"));
        return Ok(());
    }
    for record in &results {
        out.plain(&record_row(out.theme(), record));
    }
    out.plain("");
    out.plain(&footer(results.len(), "result"));
    Ok(())
}
