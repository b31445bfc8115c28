//! Show-version / update-version commands

use anyhow::{Context as _, Result};
use apm_core::channel::{ReleaseVersion, default_sources, latest_release};
use apm_core::flake::{read_nixpkgs_version, set_nixpkgs_version};
use apm_core::remote::http_client;
use apm_core::{AssumeYes, Prompter, SectionOutcome, flake_path};

use crate::ops::context::load_tree;
use crate::ui::{Output, StdinPrompter};

pub fn show_version() -> Result<()> {
    let flake = flake_path(&load_tree()?);
    let out = Output::new();
    match read_nixpkgs_version(&flake)? {
        Some(version) => out.plain(&format!("nixos-{version}")),
        None => out.warning(&format!(
            "no nixos-XX.YY release pinned in {}",
            flake.display()
        )),
    }
    Ok(())
}

/// Pin nixpkgs to the newest stable release.
pub async fn update_version(yes: bool) -> Result<()> {
    let flake = flake_path(&load_tree()?);
    let out = Output::new();

    let current = read_nixpkgs_version(&flake)?;
    out.section("Checking releases");
    let latest = latest_release(&http_client()?, &default_sources())
        .await
        .context("could not determine the latest NixOS release")?;
    out.info(&format!("Latest stable release: nixos-{latest}"));

    let pinned = current
        .as_deref()
        .and_then(|v| v.parse::<ReleaseVersion>().ok());
    if let Some(pinned) = pinned.filter(|p| *p >= latest) {
        out.success(&format!("Already on nixos-{pinned}"));
        return Ok(());
    }

    let prompter: Box<dyn Prompter> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompter)
    };
    match set_nixpkgs_version(&flake, &latest.to_string(), prompter.as_ref())? {
        SectionOutcome::Added => {
            out.success(&format!("nixpkgs pinned to nixos-{latest}"));
            out.info("Run 'apm update' and 'apm rebuild-system' to apply");
        }
        SectionOutcome::AlreadyPresent => out.success(&format!("Already on nixos-{latest}")),
        SectionOutcome::Cancelled => out.warning("Cancelled; flake.nix unchanged"),
    }
    Ok(())
}
