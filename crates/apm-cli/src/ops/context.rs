//! Shared operation context.
//!
//! Groups the tree location and the two user-facing collaborators so the
//! tree path is threaded explicitly instead of re-read at each call site.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use apm_core::{AssumeYes, Prompter, Reporter, try_config_dir};

use crate::store::location;
use crate::ui::{Output, StdinPrompter};

#[derive(Clone)]
pub struct Context {
    /// Root of the user's flake tree.
    pub tree: PathBuf,
    pub reporter: Arc<dyn Reporter>,
    pub prompter: Arc<dyn Prompter>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl Context {
    pub fn new(tree: PathBuf, reporter: Arc<dyn Reporter>, prompter: Arc<dyn Prompter>) -> Self {
        Self {
            tree,
            reporter,
            prompter,
        }
    }

    /// Context for a command run from the terminal: stored tree location,
    /// terminal output, and stdin confirmation unless `yes`.
    pub fn load(yes: bool) -> Result<Self> {
        let tree = load_tree()?;
        let prompter: Arc<dyn Prompter> = if yes {
            Arc::new(AssumeYes)
        } else {
            Arc::new(StdinPrompter)
        };
        Ok(Self::new(tree, Arc::new(Output::new()), prompter))
    }
}

/// Resolve the tree path from the stored location file.
pub fn load_tree() -> Result<PathBuf> {
    let config_dir = try_config_dir().context("could not determine home directory")?;
    let tree = location::load_or_init(&config_dir).context("could not read the flake location")?;
    tracing::debug!("flake tree at {}", tree.display());
    Ok(tree)
}
