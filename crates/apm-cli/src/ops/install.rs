//! Package installation into the flake tree.
//!
//! One install walks these phases in order, stopping at the first terminal
//! result:
//!
//! 1. Resolve the name (local index, or Flathub for Flatpak apps).
//! 2. Check the whole tree for an entry that already declares it.
//! 3. For `--unstable`, make sure the `unstable` input is declared.
//! 4. Ask once for the install itself.
//! 5. If no file defines the method's block, create one under `packages/`
//!    and register it as a module.
//! 6. Insert the entry into every file defining the block.
//!
//! Files are edited one at a time. An interrupted run keeps the edits already
//! made to earlier files; there is no cross-file rollback.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use apm_core::edit::block::{insert_entry, read_entries};
use apm_core::edit::section::{MODULES_LABEL, insert_list_entry};
use apm_core::flake::{
    FLATPAK_INPUT, FLATPAK_MODULE, HOME_MANAGER_INPUT, HOME_MANAGER_MODULE, NIX_FLATPAK_URL,
    UNSTABLE_INPUT, UNSTABLE_URL, add_input,
};
use apm_core::flathub::{AppDirectory, resolve_app_id};
use apm_core::tree::scan_block;
use apm_core::{
    AssumeYes, EditError, InsertOutcome, PresenceTest, SectionOutcome, flake_path, packages_dir,
};
use apm_schema::{InstallationMethod, PackageRecord, bare_name};
use async_trait::async_trait;

use super::{Context, InstallError};
use crate::store::PackageIndex;

/// What a package source made of the requested name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name to install.
    Found(String),
    /// Nothing matched; `suggestions` may offer near matches.
    Missing { suggestions: Vec<PackageRecord> },
}

/// Where a method looks up package names.
#[async_trait(?Send)]
pub trait PackageSource {
    async fn resolve(&self, name: &str, exact: bool) -> Result<Resolution, InstallError>;
}

/// Nixpkgs names, checked against the local index.
#[derive(Debug)]
pub struct LocalIndex<'a>(pub &'a PackageIndex);

#[async_trait(?Send)]
impl PackageSource for LocalIndex<'_> {
    async fn resolve(&self, name: &str, exact: bool) -> Result<Resolution, InstallError> {
        let bare = bare_name(name);
        if self.0.exists(bare)? {
            return Ok(Resolution::Found(name.to_string()));
        }
        let suggestions = if exact {
            Vec::new()
        } else {
            self.0.search(bare)?
        };
        Ok(Resolution::Missing { suggestions })
    }
}

/// Flatpak application ids, resolved against a remote directory.
pub struct FlathubSource<'a>(pub &'a dyn AppDirectory);

impl std::fmt::Debug for FlathubSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("FlathubSource").finish_non_exhaustive()
    }
}

#[async_trait(?Send)]
impl PackageSource for FlathubSource<'_> {
    async fn resolve(&self, name: &str, exact: bool) -> Result<Resolution, InstallError> {
        if let Some(app_id) = resolve_app_id(self.0, name, exact).await? {
            return Ok(Resolution::Found(app_id));
        }
        let suggestions = if exact || !name.contains('.') {
            // A bare term already went through search and came back empty
            Vec::new()
        } else {
            self.0.search(name).await.unwrap_or_default()
        };
        Ok(Resolution::Missing { suggestions })
    }
}

/// One `apm add` invocation.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub name: String,
    pub method: InstallationMethod,
    pub unstable: bool,
    pub exact: bool,
}

#[derive(Debug)]
pub enum InstallOutcome {
    NotFound {
        name: String,
        suggestions: Vec<PackageRecord>,
    },
    /// Some file in the tree already declares the package. Nothing written.
    AlreadyInstalled { name: String, files: Vec<PathBuf> },
    /// The user declined. Nothing written.
    Cancelled,
    /// At least one file received the entry.
    Modified {
        entry: String,
        files: Vec<PathBuf>,
        errors: Vec<EditError>,
    },
    /// No file defines the block, even after bootstrapping.
    NoBlockFiles { errors: Vec<EditError> },
    /// Every file defining the block already held an equivalent entry.
    AlreadyPresentEverywhere {
        entry: String,
        errors: Vec<EditError>,
    },
}

pub async fn install(
    ctx: &Context,
    source: &dyn PackageSource,
    req: &InstallRequest,
) -> Result<InstallOutcome, InstallError> {
    let reporter = &ctx.reporter;
    let method = req.method;
    let label = method.block_label();

    reporter.section("Resolving");
    let name = match source.resolve(&req.name, req.exact).await? {
        Resolution::Found(name) => name,
        Resolution::Missing { suggestions } => {
            return Ok(InstallOutcome::NotFound {
                name: req.name.clone(),
                suggestions,
            });
        }
    };
    tracing::debug!("resolved '{}' to '{name}'", req.name);

    let scan = scan_block(&ctx.tree, label);
    let declaring = scan.declaring(|entry| method.entry_declares(entry, &name));
    if !declaring.is_empty() {
        return Ok(InstallOutcome::AlreadyInstalled {
            name,
            files: declaring.into_iter().map(Path::to_path_buf).collect(),
        });
    }

    if req.unstable && method.uses_local_index() {
        ensure_unstable_input(ctx);
    }

    if !ctx
        .prompter
        .confirm(&format!("Install '{name}' ({method})?"))
    {
        return Ok(InstallOutcome::Cancelled);
    }

    if scan.files.is_empty() && !bootstrap(ctx, method)? {
        return Ok(InstallOutcome::Cancelled);
    }

    reporter.section("Editing");
    let scan = scan_block(&ctx.tree, label);
    let entry = method.entry_for(&name, req.unstable);
    let test = PresenceTest::for_method(method, &name);
    let mut errors = scan.errors;
    let mut added = Vec::new();

    for file in &scan.files {
        match insert_entry(&file.path, label, &entry, &test) {
            Ok(InsertOutcome::Added) => {
                reporter.success(&format!("{entry} added to {}", file.path.display()));
                added.push(file.path.clone());
            }
            Ok(InsertOutcome::AlreadyPresent) => {
                reporter.info(&format!("{entry} already in {}", file.path.display()));
            }
            Err(e) if e.is_not_found() => {
                reporter.warning(&e.to_string());
                errors.push(e);
            }
            Err(e) => {
                reporter.error(&e.to_string());
                errors.push(e);
            }
        }
    }

    Ok(if added.is_empty() && scan.files.is_empty() {
        InstallOutcome::NoBlockFiles { errors }
    } else if added.is_empty() {
        InstallOutcome::AlreadyPresentEverywhere { entry, errors }
    } else {
        InstallOutcome::Modified {
            entry,
            files: added,
            errors,
        }
    })
}

/// Declare the `unstable` input if it is missing. Never fatal.
fn ensure_unstable_input(ctx: &Context) {
    let flake = flake_path(&ctx.tree);
    match add_input(&flake, UNSTABLE_INPUT, UNSTABLE_URL, ctx.prompter.as_ref()) {
        Ok((_, SectionOutcome::Added)) => {
            ctx.reporter
                .success(&format!("Declared input '{UNSTABLE_INPUT}' in flake.nix"));
        }
        Ok((_, SectionOutcome::AlreadyPresent)) => {}
        Ok((_, SectionOutcome::Cancelled)) => ctx.reporter.warning(&format!(
            "Input '{UNSTABLE_INPUT}' not declared; the configuration may fail to evaluate"
        )),
        Err(e) => ctx.reporter.warning(&format!(
            "Could not declare input '{UNSTABLE_INPUT}': {e}; the configuration may fail to evaluate"
        )),
    }
}

/// Create `packages/<file>` with an empty block and register it in
/// `flake.nix`. Returns `false` when the user declines.
///
/// The file exists afterwards only if it was registered as a module.
fn bootstrap(ctx: &Context, method: InstallationMethod) -> Result<bool, InstallError> {
    let flake = flake_path(&ctx.tree);
    if !flake.is_file() {
        return Err(InstallError::NoFlake(ctx.tree.clone()));
    }
    // Fails when flake.nix has no modules list to register the file in
    read_entries(&flake, MODULES_LABEL)?;
    let dir = packages_dir(&ctx.tree);
    let file = dir.join(method.bootstrap_file_name());

    let support = match method {
        InstallationMethod::PerUserProfile => Some((HOME_MANAGER_INPUT, "", HOME_MANAGER_MODULE)),
        InstallationMethod::SandboxedApp => Some((FLATPAK_INPUT, NIX_FLATPAK_URL, FLATPAK_MODULE)),
        InstallationMethod::SystemWide => None,
    };
    let mut question = format!(
        "No file defines {}. Create {} and register it in flake.nix",
        method.block_label(),
        file.display()
    );
    if let Some((input, ..)) = support {
        question.push_str(&format!(" (with the '{input}' input)"));
    }
    question.push('?');
    if !ctx.prompter.confirm(&question) {
        return Ok(false);
    }

    ctx.reporter.section("Bootstrapping");
    // The question above covered every write below
    if let Some((input, url, module)) = support {
        let (spec, outcome) = add_input(&flake, input, url, &AssumeYes)?;
        if outcome == SectionOutcome::Added {
            ctx.reporter
                .success(&format!("Declared input '{}' ({})", spec.name, spec.url));
        }
        register_module(ctx, &flake, module)?;
    }

    std::fs::create_dir_all(&dir).map_err(|source| InstallError::Io {
        path: dir.clone(),
        source,
    })?;
    let io = |source| InstallError::Io {
        path: file.clone(),
        source,
    };
    let mut handle = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&file)
        .map_err(io)?;
    handle
        .write_all(method.boilerplate().as_bytes())
        .map_err(io)?;
    ctx.reporter.success(&format!("Created {}", file.display()));

    if let Err(e) = register_module(ctx, &flake, &method.bootstrap_module_path()) {
        if let Err(rm) = std::fs::remove_file(&file) {
            tracing::warn!("could not remove {}: {rm}", file.display());
        }
        return Err(e);
    }
    Ok(true)
}

fn register_module(ctx: &Context, flake: &Path, module: &str) -> Result<(), InstallError> {
    if insert_list_entry(flake, MODULES_LABEL, module, &AssumeYes)? == SectionOutcome::Added {
        ctx.reporter
            .success(&format!("Registered module {module}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apm_core::NullReporter;
    use apm_core::flathub::Flathub;
    use apm_core::prompt::ScriptedPrompter;
    use std::fs;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    const FLAKE: &str = r#"{
  inputs = {
    nixpkgs.url = "github:NixOS/nixpkgs/nixos-24.11";
  };

  outputs = { self, nixpkgs, ... }@inputs: {
    nixosConfigurations.host = nixpkgs.lib.nixosSystem {
      modules = [
        ./configuration.nix
      ];
    };
  };
}
"#;

    const HOME: &str = "{ pkgs, ... }:\n{\n  home.packages = [\n    pkgs.git\n  ];\n}\n";

    struct Catalog(&'static [&'static str]);

    #[async_trait(?Send)]
    impl PackageSource for Catalog {
        async fn resolve(&self, name: &str, exact: bool) -> Result<Resolution, InstallError> {
            let bare = bare_name(name);
            if self.0.iter().any(|n| *n == bare) {
                return Ok(Resolution::Found(name.to_string()));
            }
            let suggestions = if exact {
                Vec::new()
            } else {
                self.0
                    .iter()
                    .filter(|n| n.contains(bare))
                    .map(|n| PackageRecord::new(*n, "1.0", ""))
                    .collect()
            };
            Ok(Resolution::Missing { suggestions })
        }
    }

    const CATALOG: Catalog = Catalog(&["firefox", "firefox-esr", "neovim", "htop"]);

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn context(root: &Path, prompter: Arc<ScriptedPrompter>) -> Context {
        Context::new(root.to_path_buf(), Arc::new(NullReporter), prompter)
    }

    fn request(name: &str, method: InstallationMethod) -> InstallRequest {
        InstallRequest {
            name: name.to_string(),
            method,
            unstable: false,
            exact: false,
        }
    }

    #[tokio::test]
    async fn test_fresh_profile_install() {
        let dir = tree(&[("flake.nix", FLAKE), ("home.nix", HOME)]);
        let prompter = Arc::new(ScriptedPrompter::new([true]));
        let ctx = context(dir.path(), prompter.clone());

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("firefox", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();

        let InstallOutcome::Modified { entry, files, errors } = outcome else {
            panic!("expected Modified, got {outcome:?}");
        };
        assert_eq!(entry, "pkgs.firefox");
        assert_eq!(files, vec![dir.path().join("home.nix")]);
        assert!(errors.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("home.nix")).unwrap(),
            "{ pkgs, ... }:\n{\n  home.packages = [\n    pkgs.git\n    pkgs.firefox\n  ];\n}\n"
        );
        assert_eq!(prompter.asked(), vec!["Install 'firefox' (home-manager)?"]);
    }

    #[tokio::test]
    async fn test_already_installed_writes_nothing() {
        let home = "{ pkgs, ... }:\n{\n  home.packages = [\n    pkgs.firefox\n  ];\n}\n";
        let dir = tree(&[("flake.nix", FLAKE), ("modules/home.nix", home)]);
        let prompter = Arc::new(ScriptedPrompter::new([]));
        let ctx = context(dir.path(), prompter.clone());

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("firefox", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { ref files, .. } if files.len() == 1));
        assert!(prompter.asked().is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join("modules/home.nix")).unwrap(),
            home
        );
    }

    #[tokio::test]
    async fn test_not_found_offers_suggestions() {
        let dir = tree(&[("home.nix", HOME)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([])));

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("firef", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();
        let InstallOutcome::NotFound { suggestions, .. } = outcome else {
            panic!("expected NotFound");
        };
        assert_eq!(suggestions.len(), 2);

        let mut exact = request("firef", InstallationMethod::PerUserProfile);
        exact.exact = true;
        let outcome = install(&ctx, &CATALOG, &exact).await.unwrap();
        assert!(matches!(outcome, InstallOutcome::NotFound { ref suggestions, .. } if suggestions.is_empty()));
    }

    #[tokio::test]
    async fn test_declined_install_is_cancelled() {
        let dir = tree(&[("flake.nix", FLAKE), ("home.nix", HOME)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([false])));

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("htop", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, InstallOutcome::Cancelled));
        assert_eq!(fs::read_to_string(dir.path().join("home.nix")).unwrap(), HOME);
    }

    #[tokio::test]
    async fn test_bootstraps_missing_system_block() {
        let config = "{ config, pkgs, ... }:\n{\n  networking.hostName = \"host\";\n}\n";
        let dir = tree(&[("flake.nix", FLAKE), ("configuration.nix", config)]);
        let prompter = Arc::new(ScriptedPrompter::new([true, true]));
        let ctx = context(dir.path(), prompter.clone());

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("htop", InstallationMethod::SystemWide),
        )
        .await
        .unwrap();

        let created = dir.path().join("packages/environment-packages.nix");
        assert!(matches!(outcome, InstallOutcome::Modified { ref files, .. } if files == &vec![created.clone()]));
        assert_eq!(
            fs::read_to_string(&created).unwrap(),
            "{ config, pkgs, ... }:\n\n{\n  environment.systemPackages = [\n    pkgs.htop\n  ];\n}\n"
        );
        let flake = fs::read_to_string(dir.path().join("flake.nix")).unwrap();
        assert!(flake.contains("        ./configuration.nix\n        ./packages/environment-packages.nix\n"));
        assert_eq!(fs::read_to_string(dir.path().join("configuration.nix")).unwrap(), config);
        assert_eq!(prompter.asked().len(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_declined_is_cancelled() {
        let dir = tree(&[("flake.nix", FLAKE)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true, false])));

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("htop", InstallationMethod::SystemWide),
        )
        .await
        .unwrap();
        assert!(matches!(outcome, InstallOutcome::Cancelled));
        assert!(!dir.path().join("packages").exists());
        assert_eq!(fs::read_to_string(dir.path().join("flake.nix")).unwrap(), FLAKE);
    }

    #[tokio::test]
    async fn test_bootstrap_without_flake_fails() {
        let dir = tree(&[("configuration.nix", "{ }\n")]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true, true])));

        let err = install(
            &ctx,
            &CATALOG,
            &request("htop", InstallationMethod::SystemWide),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, InstallError::NoFlake(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_without_modules_list_creates_nothing() {
        let flake = "{\n  inputs = {\n    nixpkgs.url = \"github:NixOS/nixpkgs/nixos-24.11\";\n  };\n  outputs = { ... }: { };\n}\n";
        let dir = tree(&[("flake.nix", flake)]);

        for _ in 0..2 {
            let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true, true])));
            let err = install(
                &ctx,
                &CATALOG,
                &request("htop", InstallationMethod::SystemWide),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, InstallError::Edit(ref e) if e.is_not_found()));
            assert!(!dir.path().join("packages").exists());
        }
        assert_eq!(fs::read_to_string(dir.path().join("flake.nix")).unwrap(), flake);
    }

    #[tokio::test]
    async fn test_profile_bootstrap_declares_home_manager() {
        let dir = tree(&[("flake.nix", FLAKE)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true, true])));

        install(
            &ctx,
            &CATALOG,
            &request("neovim", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();

        let flake = fs::read_to_string(dir.path().join("flake.nix")).unwrap();
        assert!(flake.contains(
            "home-manager.url = \"github:nix-community/home-manager/release-24.11\";"
        ));
        assert!(flake.contains("home-manager.inputs.nixpkgs.follows = \"nixpkgs\";"));
        assert!(flake.contains(HOME_MANAGER_MODULE));
        assert!(flake.contains("./packages/home-packages.nix"));
        let created = fs::read_to_string(dir.path().join("packages/home-packages.nix")).unwrap();
        assert!(created.contains("    pkgs.neovim\n"));
    }

    #[tokio::test]
    async fn test_unstable_asks_for_input_first() {
        let dir = tree(&[("flake.nix", FLAKE), ("home.nix", HOME)]);
        let prompter = Arc::new(ScriptedPrompter::new([true, true]));
        let ctx = context(dir.path(), prompter.clone());

        let mut req = request("neovim", InstallationMethod::PerUserProfile);
        req.unstable = true;
        let outcome = install(&ctx, &CATALOG, &req).await.unwrap();

        assert!(matches!(outcome, InstallOutcome::Modified { ref entry, .. } if entry == "unstable.neovim"));
        let asked = prompter.asked();
        assert_eq!(asked.len(), 2);
        assert!(asked[0].contains("'unstable'"));
        assert!(asked[1].starts_with("Install 'neovim'"));
        let flake = fs::read_to_string(dir.path().join("flake.nix")).unwrap();
        assert!(flake.contains(&format!("unstable.url = \"{UNSTABLE_URL}\";")));
    }

    #[tokio::test]
    async fn test_unstable_input_declined_still_installs() {
        let dir = tree(&[("flake.nix", FLAKE), ("home.nix", HOME)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([false, true])));

        let mut req = request("neovim", InstallationMethod::PerUserProfile);
        req.unstable = true;
        let outcome = install(&ctx, &CATALOG, &req).await.unwrap();

        assert!(matches!(outcome, InstallOutcome::Modified { .. }));
        assert_eq!(fs::read_to_string(dir.path().join("flake.nix")).unwrap(), FLAKE);
    }

    #[tokio::test]
    async fn test_entry_sharing_a_line_counts_as_installed() {
        let home = "{ pkgs, ... }:\n{\n  home.packages = [ pkgs.git pkgs.neovim ];\n}\n";
        let dir = tree(&[("flake.nix", FLAKE), ("home.nix", home)]);
        let prompter = Arc::new(ScriptedPrompter::new([]));
        let ctx = context(dir.path(), prompter.clone());

        let mut req = request("neovim", InstallationMethod::PerUserProfile);
        let outcome = install(&ctx, &CATALOG, &req).await.unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { .. }));

        req.unstable = true;
        let outcome = install(&ctx, &CATALOG, &req).await.unwrap();
        assert!(matches!(outcome, InstallOutcome::AlreadyInstalled { .. }));

        assert!(prompter.asked().is_empty());
        assert_eq!(fs::read_to_string(dir.path().join("home.nix")).unwrap(), home);
        assert_eq!(fs::read_to_string(dir.path().join("flake.nix")).unwrap(), FLAKE);
    }

    #[tokio::test]
    async fn test_inserts_into_every_defining_file() {
        let other = "{ pkgs, ... }:\n{\n  home.packages = [ pkgs.jq ];\n}\n";
        let dir = tree(&[("a.nix", HOME), ("b.nix", other)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true])));

        let outcome = install(
            &ctx,
            &CATALOG,
            &request("htop", InstallationMethod::PerUserProfile),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, InstallOutcome::Modified { ref files, .. } if files.len() == 2));
        assert_eq!(
            fs::read_to_string(dir.path().join("b.nix")).unwrap(),
            "{ pkgs, ... }:\n{\n  home.packages = [ pkgs.jq pkgs.htop ];\n}\n"
        );
    }

    #[tokio::test]
    async fn test_flatpak_install_resolves_through_flathub() {
        let mut server = mockito::Server::new_async().await;
        let _search = server
            .mock("GET", "/apps/search/krita")
            .with_status(200)
            .with_body(r#"[{"flatpakAppId": "org.kde.krita", "summary": "Painting"}]"#)
            .create_async()
            .await;
        let _detail = server
            .mock("GET", "/apps/org.kde.krita")
            .with_status(200)
            .with_body(r#"{"flatpakAppId": "org.kde.krita"}"#)
            .create_async()
            .await;

        let flatpaks = "{ ... }:\n{\n  services.flatpak.packages = [\n  ];\n}\n";
        let dir = tree(&[("flake.nix", FLAKE), ("flatpak.nix", flatpaks)]);
        let ctx = context(dir.path(), Arc::new(ScriptedPrompter::new([true])));
        let flathub = Flathub::new(reqwest::Client::new(), server.url());

        let outcome = install(
            &ctx,
            &FlathubSource(&flathub),
            &request("krita", InstallationMethod::SandboxedApp),
        )
        .await
        .unwrap();

        assert!(matches!(outcome, InstallOutcome::Modified { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("flatpak.nix")).unwrap(),
            "{ ... }:\n{\n  services.flatpak.packages = [\n    { appId = \"org.kde.krita\"; origin = \"flathub\"; }\n  ];\n}\n"
        );
    }
}
