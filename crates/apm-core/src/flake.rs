//! Reading and rewriting well-known parts of `flake.nix`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::edit::section::{INPUTS_LABEL, insert_map_entry};
use crate::edit::{EditError, Miss, SectionOutcome, read_file, strip_comment, write_file};
use crate::prompt::Prompter;

/// Input name and URL of the unstable nixpkgs channel.
pub const UNSTABLE_INPUT: &str = "unstable";
pub const UNSTABLE_URL: &str = "github:NixOS/nixpkgs/nixos-unstable";

pub const HOME_MANAGER_INPUT: &str = "home-manager";
/// Module that enables home-manager as a NixOS module.
pub const HOME_MANAGER_MODULE: &str = "inputs.home-manager.nixosModules.home-manager";
/// Release used when the nixpkgs version cannot be read.
pub const HOME_MANAGER_FALLBACK_RELEASE: &str = "24.11";

pub const FLATPAK_INPUT: &str = "flatpaks";
pub const NIX_FLATPAK_URL: &str = "github:gmodena/nix-flatpak/?ref=latest";
pub const FLATPAK_MODULE: &str = "flatpaks.nixosModules.nix-flatpak";

const NIXPKGS_URL_KEY: &str = "nixpkgs.url =";

static NIXOS_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"nixos-(\d+\.\d+)").unwrap());

static NIXPKGS_REPO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(github(?:\.com)?[:/]NixOS/nixpkgs)([^"]*")"#).unwrap());

fn nixpkgs_url_line(content: &str) -> Option<(usize, &str)> {
    content
        .split('\n')
        .enumerate()
        .find(|(_, line)| strip_comment(line).contains(NIXPKGS_URL_KEY))
}

/// The `XX.YY` release pinned by the uncommented `nixpkgs.url` line.
pub fn nixpkgs_version(content: &str) -> Option<String> {
    let (_, line) = nixpkgs_url_line(content)?;
    NIXOS_VERSION
        .captures(strip_comment(line))
        .map(|c| c[1].to_string())
}

/// Content with the `nixpkgs.url` line pinned to `version`.
///
/// An existing `nixos-XX.YY` is replaced; otherwise `/nixos-XX.YY` is
/// appended after the nixpkgs repository path. A line tracking
/// `nixos-unstable` is left alone.
pub fn with_nixpkgs_version(content: &str, version: &str) -> Result<String, Miss> {
    let (idx, line) = nixpkgs_url_line(content).ok_or(Miss("nixpkgs.url not declared"))?;

    let replacement = format!("nixos-{version}");
    let updated = if NIXOS_VERSION.is_match(line) {
        NIXOS_VERSION.replace(line, replacement.as_str()).into_owned()
    } else if strip_comment(line).contains("nixos-unstable") {
        return Err(Miss("nixpkgs.url tracks nixos-unstable"));
    } else if NIXPKGS_REPO.is_match(line) {
        NIXPKGS_REPO
            .replace(line, format!("${{1}}/{replacement}${{2}}").as_str())
            .into_owned()
    } else {
        return Err(Miss("nixpkgs.url does not point at NixOS/nixpkgs"));
    };

    let mut lines: Vec<&str> = content.split('\n').collect();
    lines[idx] = &updated;
    Ok(lines.join("\n"))
}

/// Read the pinned nixpkgs release of the flake at `path`.
pub fn read_nixpkgs_version(path: &Path) -> Result<Option<String>, EditError> {
    Ok(nixpkgs_version(&read_file(path)?))
}

/// Pin the flake at `path` to `version` after confirmation.
pub fn set_nixpkgs_version(
    path: &Path,
    version: &str,
    prompter: &dyn Prompter,
) -> Result<SectionOutcome, EditError> {
    let content = read_file(path)?;
    if nixpkgs_version(&content).as_deref() == Some(version) {
        return Ok(SectionOutcome::AlreadyPresent);
    }
    let updated = with_nixpkgs_version(&content, version)
        .map_err(|m| EditError::not_found(path, NIXPKGS_URL_KEY, m))?;

    if !prompter.confirm(&format!("Pin nixpkgs to nixos-{version}?")) {
        return Ok(SectionOutcome::Cancelled);
    }
    write_file(path, &updated)?;
    Ok(SectionOutcome::Added)
}

/// home-manager release branch matching a nixpkgs release.
pub fn home_manager_url(nixpkgs_version: Option<&str>) -> String {
    let release = nixpkgs_version.unwrap_or(HOME_MANAGER_FALLBACK_RELEASE);
    format!("github:nix-community/home-manager/release-{release}")
}

/// What `add-input` actually writes for a requested name and URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSpec {
    pub name: String,
    pub url: String,
    pub extra_lines: Vec<String>,
}

impl InputSpec {
    /// Apply the well-known input special cases. `home-manager` follows the
    /// flake's nixpkgs release and nixpkgs itself; `flatpak(s)` always points
    /// at nix-flatpak.
    pub fn resolve(name: &str, url: &str, nixpkgs_version: Option<&str>) -> Self {
        match name {
            HOME_MANAGER_INPUT => Self {
                name: name.to_string(),
                url: home_manager_url(nixpkgs_version),
                extra_lines: vec![format!("{name}.inputs.nixpkgs.follows = \"nixpkgs\";")],
            },
            "flatpaks" | "flatpak" => Self {
                name: name.to_string(),
                url: NIX_FLATPAK_URL.to_string(),
                extra_lines: Vec::new(),
            },
            _ => Self {
                name: name.to_string(),
                url: url.to_string(),
                extra_lines: Vec::new(),
            },
        }
    }
}

/// Declare an input in the flake at `path`, applying [`InputSpec::resolve`].
pub fn add_input(
    path: &Path,
    name: &str,
    url: &str,
    prompter: &dyn Prompter,
) -> Result<(InputSpec, SectionOutcome), EditError> {
    let version = if name == HOME_MANAGER_INPUT {
        let version = read_nixpkgs_version(path)?;
        if version.is_none() {
            tracing::warn!(
                "could not read nixpkgs release; using home-manager release-{HOME_MANAGER_FALLBACK_RELEASE}"
            );
        }
        version
    } else {
        None
    };

    let spec = InputSpec::resolve(name, url, version.as_deref());
    let outcome = insert_map_entry(
        path,
        INPUTS_LABEL,
        &spec.name,
        &spec.url,
        &spec.extra_lines,
        prompter,
    )?;
    Ok((spec, outcome))
}

/// The two module attribute paths an input conventionally exports.
pub fn module_suggestions(name: &str, url: &str) -> [String; 2] {
    let (nixos, home) = if url.contains("home-manager") {
        ("home-manager", "default")
    } else if url.contains("flatpak") {
        ("nix-flatpak", "nix-flatpak")
    } else {
        ("default", "default")
    };
    [
        format!("{name}.nixosModules.{nixos}"),
        format!("{name}.homeManagerModules.{home}"),
    ]
}
