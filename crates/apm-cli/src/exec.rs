//! External `nix` and `nixos-rebuild` invocations.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use apm_schema::PackageRecord;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("unreadable nix search output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One value of the `nix search --json` mapping.
#[derive(Deserialize)]
struct SearchHit {
    pname: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    description: String,
}

/// Map `nix search --json` output to records, one per package name.
///
/// Attribute paths are visited in sorted order; the first path carrying a
/// given `pname` wins.
pub fn parse_search_json(json: &str) -> Result<Vec<PackageRecord>, ExecError> {
    let hits: BTreeMap<String, SearchHit> = serde_json::from_str(json)?;
    let mut by_name: BTreeMap<String, PackageRecord> = BTreeMap::new();
    for (attr, hit) in hits {
        if hit.pname.is_empty() {
            tracing::trace!("skipping {attr}: no pname");
            continue;
        }
        by_name
            .entry(hit.pname.clone())
            .or_insert_with(|| PackageRecord::new(hit.pname, hit.version, hit.description));
    }
    Ok(by_name.into_values().collect())
}

/// Run `nix search nixpkgs "" --json` and parse its output.
pub fn nix_search_all() -> Result<Vec<PackageRecord>, ExecError> {
    let program = "nix";
    let output = Command::new(program)
        .args(["search", "nixpkgs", "", "--json"])
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| ExecError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(ExecError::Failed {
            program: program.to_string(),
            status: output.status,
        });
    }
    parse_search_json(&String::from_utf8_lossy(&output.stdout))
}

/// `sudo nixos-rebuild switch --flake <tree>`
pub fn rebuild_switch(tree: &Path) -> Result<(), ExecError> {
    let mut cmd = Command::new("sudo");
    cmd.arg("nixos-rebuild")
        .arg("switch")
        .arg("--flake")
        .arg(tree);
    run_inherited("nixos-rebuild", &mut cmd)
}

/// `sudo nix flake update`, run inside the tree.
pub fn flake_update(tree: &Path) -> Result<(), ExecError> {
    let mut cmd = Command::new("sudo");
    cmd.args(["nix", "flake", "update"]).current_dir(tree);
    run_inherited("nix flake update", &mut cmd)
}

fn run_inherited(program: &str, cmd: &mut Command) -> Result<(), ExecError> {
    tracing::debug!("running {cmd:?}");
    let status = cmd.status().map_err(|source| ExecError::Spawn {
        program: program.to_string(),
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(ExecError::Failed {
            program: program.to_string(),
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_json_dedups_by_pname() {
        let json = r#"{
            "legacyPackages.x86_64-linux.python312Packages.requests": {
                "pname": "requests", "version": "2.32.3", "description": "HTTP for Humans"
            },
            "legacyPackages.x86_64-linux.firefox": {
                "pname": "firefox", "version": "131.0", "description": "A web browser"
            },
            "legacyPackages.x86_64-linux.python311Packages.requests": {
                "pname": "requests", "version": "2.31.0", "description": "older"
            }
        }"#;
        let records = parse_search_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "firefox");
        assert_eq!(records[1].name, "requests");
        // python311 sorts before python312
        assert_eq!(records[1].version, "2.31.0");
    }

    #[test]
    fn test_parse_search_json_missing_fields() {
        let json = r#"{"a.hello": {"pname": "hello"}, "a.blank": {"pname": ""}}"#;
        let records = parse_search_json(json).unwrap();
        assert_eq!(records, vec![PackageRecord::new("hello", "", "")]);
    }

    #[test]
    fn test_parse_search_json_rejects_garbage() {
        assert!(matches!(
            parse_search_json("not json"),
            Err(ExecError::Parse(_))
        ));
    }
}
