//! Installation methods and the configuration blocks they write to.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Prefix of entries that come from the `unstable` nixpkgs input.
pub const UNSTABLE_PREFIX: &str = "unstable.";

/// Prefix of entries that come from the default `pkgs` set.
pub const PKGS_PREFIX: &str = "pkgs.";

/// Errors raised while choosing an installation method.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MethodError {
    /// More than one of `--nix-env`, `--flatpak`, `--home-manager` was given.
    #[error("multiple installation methods specified; pick one of --nix-env, --flatpak, --home-manager")]
    Multiple,

    /// A method name did not match any known method.
    #[error("invalid installation method '{0}' (expected nix-env, flatpak or home-manager)")]
    Unknown(String),
}

/// Where a package reference gets declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallationMethod {
    /// `environment.systemPackages`, installed for every user.
    SystemWide,
    /// `services.flatpak.packages`, sandboxed applications from Flathub.
    SandboxedApp,
    /// `home.packages`, installed into the user's home-manager profile.
    PerUserProfile,
}

impl InstallationMethod {
    /// All methods, in flag order.
    pub const ALL: [Self; 3] = [Self::SystemWide, Self::SandboxedApp, Self::PerUserProfile];

    /// Choose a method from the three mutually exclusive selector flags.
    ///
    /// No flag selects [`InstallationMethod::PerUserProfile`].
    pub fn from_flags(flatpak: bool, nix_env: bool, home_manager: bool) -> Result<Self, MethodError> {
        let count = [flatpak, nix_env, home_manager]
            .iter()
            .filter(|&&set| set)
            .count();
        if count > 1 {
            return Err(MethodError::Multiple);
        }
        Ok(if flatpak {
            Self::SandboxedApp
        } else if nix_env {
            Self::SystemWide
        } else {
            Self::PerUserProfile
        })
    }

    /// Label of the list block this method edits.
    pub fn block_label(self) -> &'static str {
        match self {
            Self::SystemWide => "environment.systemPackages",
            Self::SandboxedApp => "services.flatpak.packages",
            Self::PerUserProfile => "home.packages",
        }
    }

    /// Command-line name of the method (also its flag without dashes).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SystemWide => "nix-env",
            Self::SandboxedApp => "flatpak",
            Self::PerUserProfile => "home-manager",
        }
    }

    /// File created under `<tree>/packages/` when no file declares the block yet.
    pub fn bootstrap_file_name(self) -> &'static str {
        match self {
            Self::SystemWide => "environment-packages.nix",
            Self::SandboxedApp => "flatpak-packages.nix",
            Self::PerUserProfile => "home-packages.nix",
        }
    }

    /// Module path registered in `flake.nix` for the bootstrapped file.
    pub fn bootstrap_module_path(self) -> String {
        format!("./packages/{}", self.bootstrap_file_name())
    }

    /// Content of a freshly bootstrapped package file: an empty block.
    pub fn boilerplate(self) -> String {
        format!(
            "{{ config, pkgs, ... }}:\n\n{{\n  {} = [\n  ];\n}}\n",
            self.block_label()
        )
    }

    /// Whether this method resolves names against the local nixpkgs index.
    pub fn uses_local_index(self) -> bool {
        !matches!(self, Self::SandboxedApp)
    }

    /// Build the entry text written into the block for `name`.
    ///
    /// Sandboxed apps always get a structured literal. Profile and system
    /// installs get `pkgs.<name>`, or `unstable.<name>` when requested; a name
    /// that already carries either prefix is kept, and the prefix is never
    /// applied twice.
    pub fn entry_for(self, name: &str, unstable: bool) -> String {
        match self {
            Self::SandboxedApp => format!(r#"{{ appId = "{name}"; origin = "flathub"; }}"#),
            Self::SystemWide | Self::PerUserProfile => {
                if unstable {
                    if name.starts_with(UNSTABLE_PREFIX) {
                        return name.to_string();
                    }
                    return format!("{UNSTABLE_PREFIX}{}", bare_name(name));
                }
                if name.starts_with(PKGS_PREFIX) || name.starts_with(UNSTABLE_PREFIX) {
                    name.to_string()
                } else {
                    format!("{PKGS_PREFIX}{name}")
                }
            }
        }
    }

    /// Whether an existing block entry already declares `name`.
    ///
    /// Profile and system entries declare `name` when the entry, or one of its
    /// whitespace-separated tokens, [is](Self::entry_is) that package, so
    /// `pkgs.git pkgs.vim` declares both. Sandboxed-app entries match when the
    /// entry text contains the application id anywhere; this is permissive and
    /// can report a false positive for ids that are substrings of other ids.
    pub fn entry_declares(self, entry: &str, name: &str) -> bool {
        match self {
            Self::SandboxedApp => entry.contains(name),
            Self::SystemWide | Self::PerUserProfile => entry
                .split_whitespace()
                .any(|tok| self.entry_is(tok, name)),
        }
    }

    /// Whether the whole entry is `name`, in its bare, `pkgs.`-prefixed or
    /// `unstable.`-prefixed form. Removal deletes only such entries.
    pub fn entry_is(self, entry: &str, name: &str) -> bool {
        let entry = entry.trim();
        match self {
            Self::SandboxedApp => entry.contains(name),
            Self::SystemWide | Self::PerUserProfile => {
                let bare = bare_name(name);
                entry == name
                    || entry == bare
                    || entry.strip_prefix(PKGS_PREFIX) == Some(bare)
                    || entry.strip_prefix(UNSTABLE_PREFIX) == Some(bare)
            }
        }
    }
}

/// Strip a leading `pkgs.` or `unstable.` from a package reference.
pub fn bare_name(name: &str) -> &str {
    name.strip_prefix(PKGS_PREFIX)
        .or_else(|| name.strip_prefix(UNSTABLE_PREFIX))
        .unwrap_or(name)
}

impl fmt::Display for InstallationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallationMethod {
    type Err = MethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nix-env" => Ok(Self::SystemWide),
            "flatpak" => Ok(Self::SandboxedApp),
            "home-manager" => Ok(Self::PerUserProfile),
            other => Err(MethodError::Unknown(other.to_string())),
        }
    }
}
