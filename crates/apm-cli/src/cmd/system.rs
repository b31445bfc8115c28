//! Update / rebuild-system commands

use anyhow::Result;

use crate::exec::{flake_update, rebuild_switch};
use crate::ops::context::load_tree;
use crate::ui::Output;

/// `sudo nix flake update` in the tree.
pub fn update() -> Result<()> {
    let tree = load_tree()?;
    flake_update(&tree)?;
    Output::new().success("Flake inputs updated");
    Ok(())
}

/// `sudo nixos-rebuild switch --flake <tree>`
pub fn rebuild() -> Result<()> {
    let tree = load_tree()?;
    rebuild_switch(&tree)?;
    Output::new().success("System rebuilt");
    Ok(())
}
