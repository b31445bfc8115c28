//! Flake input commands: add-input, list-inputs, list-modules

use std::path::PathBuf;

use anyhow::{Result, bail};
use apm_core::edit::section::read_inputs;
use apm_core::flake::{FLATPAK_INPUT, HOME_MANAGER_INPUT, add_input as declare_input, module_suggestions};
use apm_core::{AssumeYes, Prompter, SectionOutcome, flake_path};
use apm_schema::InputDecl;

use crate::ops::context::load_tree;
use crate::ui::list::{footer, input_row};
use crate::ui::{Output, StdinPrompter};

fn flake_file() -> Result<PathBuf> {
    let tree = load_tree()?;
    let flake = flake_path(&tree);
    if !flake.is_file() {
        bail!("no flake.nix in {}", tree.display());
    }
    Ok(flake)
}

/// Inputs whose URL is filled in when none is given.
fn url_is_implied(name: &str) -> bool {
    matches!(name, HOME_MANAGER_INPUT | FLATPAK_INPUT | "flatpak")
}

pub fn add_input(name: &str, url: Option<&str>, yes: bool) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None if url_is_implied(name) => "",
        None => bail!("input '{name}' needs a flake URL"),
    };
    let flake = flake_file()?;
    let prompter: Box<dyn Prompter> = if yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompter)
    };

    let out = Output::new();
    let (spec, outcome) = declare_input(&flake, name, url, prompter.as_ref())?;
    match outcome {
        SectionOutcome::Added => {
            out.success(&format!("Input '{}' declared ({})", spec.name, spec.url));
            out.info("Modules it likely exports:");
            for module in module_suggestions(&spec.name, &spec.url) {
                out.plain(&format!("  {module}"));
            }
        }
        SectionOutcome::AlreadyPresent => {
            out.info(&format!("Input '{}' is already declared", spec.name));
        }
        SectionOutcome::Cancelled => out.warning("Cancelled; flake.nix unchanged"),
    }
    Ok(())
}

pub fn list_inputs() -> Result<()> {
    let inputs = read_inputs(&flake_file()?)?;
    let out = Output::new();
    if inputs.is_empty() {
        out.info("No inputs declared");
        return Ok(());
    }
    for input in &inputs {
        out.plain(&input_row(out.theme(), input));
    }
    out.plain("");
    out.plain(&footer(inputs.len(), "input"));
    Ok(())
}

pub fn list_modules() -> Result<()> {
    let inputs = read_inputs(&flake_file()?)?;
    let out = Output::new();
    out.section("Available input modules");
    for input in &inputs {
        if let InputDecl::Url { name, url } = input {
            for module in module_suggestions(name, url) {
                out.plain(&format!("  - {module}"));
            }
        }
    }
    Ok(())
}
