//! apm - declarative package management for NixOS flakes
//!
//! Adds, lists and removes package references inside the user's flake tree
//! without hand-editing `.nix` files.
//!
//! # Overview
//!
//! A package goes into one of three list blocks, chosen by method:
//!
//! | flag             | block                        |
//! |------------------|------------------------------|
//! | `--nix-env`      | `environment.systemPackages` |
//! | `--flatpak`      | `services.flatpak.packages`  |
//! | `--home-manager` | `home.packages` (default)    |
//!
//! Nixpkgs names are validated against a local SQLite index built by
//! `apm makecache`; Flatpak ids are resolved against Flathub.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.config/apm/flakelocation.txt   # absolute path of the flake tree
//! ~/.cache/apm/apm.db               # package index
//! ```
//!
//! `APM_HOME` relocates both under `$APM_HOME/config` and `$APM_HOME/cache`.

#![allow(missing_docs)]
#![allow(clippy::doc_markdown)]

pub mod cmd;
pub mod exec;
pub mod ops;
pub mod store;
pub mod ui;

pub use apm_core::paths::*;
pub use apm_core::USER_AGENT;

use apm_core::flathub::DEFAULT_FLATHUB_URL;
use apm_schema::{InstallationMethod, MethodError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "apm")]
#[command(author, version, about = "apm - declarative package management for NixOS flakes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The three mutually exclusive method selectors. None selects home-manager.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct MethodArgs {
    /// Use Flatpak (services.flatpak.packages)
    #[arg(long)]
    pub flatpak: bool,
    /// Install system-wide (environment.systemPackages)
    #[arg(long = "nix-env")]
    pub nix_env: bool,
    /// Install into the home-manager profile (home.packages)
    #[arg(long = "home-manager")]
    pub home_manager: bool,
}

impl MethodArgs {
    pub fn resolve(self) -> Result<InstallationMethod, MethodError> {
        InstallationMethod::from_flags(self.flatpak, self.nix_env, self.home_manager)
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a package to the configuration
    Add {
        /// Package name, or Flatpak app id / search term
        name: String,
        #[command(flatten)]
        method: MethodArgs,
        /// Take the package from the nixos-unstable input
        #[arg(long)]
        unstable: bool,
        /// Treat the name as exact: no search fallback or suggestions
        #[arg(long)]
        exact: bool,
        /// Answer yes to every confirmation
        #[arg(short, long)]
        yes: bool,
        /// Flathub API root
        #[arg(long, env = "APM_FLATHUB_URL", default_value = DEFAULT_FLATHUB_URL, hide = true)]
        flathub_url: String,
    },
    /// Remove a package from the configuration
    Remove {
        /// Package name or Flatpak app id
        name: String,
        #[command(flatten)]
        method: MethodArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List packages declared for a method
    List {
        #[command(flatten)]
        method: MethodArgs,
    },
    /// Search available packages
    Search {
        /// Search query
        query: String,
        #[command(flatten)]
        method: MethodArgs,
        /// Flathub API root
        #[arg(long, env = "APM_FLATHUB_URL", default_value = DEFAULT_FLATHUB_URL, hide = true)]
        flathub_url: String,
    },
    /// Set the location of the flake tree
    SetLocation {
        /// Directory containing flake.nix
        path: PathBuf,
    },
    /// Build the local package index from `nix search`
    Makecache,
    /// Delete the local package index
    Removecache,
    /// Declare a flake input
    AddInput {
        /// Input name (home-manager and flatpaks get their URL automatically)
        name: String,
        /// Flake reference
        url: Option<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// List declared flake inputs
    ListInputs,
    /// Suggest module paths exported by declared inputs
    ListModules,
    /// Show the pinned nixpkgs release
    ShowVersion,
    /// Pin nixpkgs to the latest stable release
    UpdateVersion {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Update flake inputs (`nix flake update`)
    Update,
    /// Rebuild and switch the system
    RebuildSystem,
}
