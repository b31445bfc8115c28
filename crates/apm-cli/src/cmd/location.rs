//! Set-location command

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use apm_core::{flake_path, try_config_dir};

use crate::store::location;
use crate::ui::Output;

pub fn set_location(path: &Path) -> Result<()> {
    if !path.is_dir() {
        bail!("{} is not a directory", path.display());
    }
    let config_dir = try_config_dir().context("could not determine home directory")?;
    let stored = location::store(&config_dir, path).context("could not store the flake location")?;

    let out = Output::new();
    out.success(&format!("Flake location set to {}", stored.display()));
    if !flake_path(&stored).is_file() {
        out.warning(&format!("{} has no flake.nix", stored.display()));
    }
    Ok(())
}
