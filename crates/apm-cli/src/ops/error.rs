//! Domain-specific errors for tree operations

use std::path::PathBuf;

use apm_core::{EditError, RemoteError};
use thiserror::Error;

use crate::store::IndexError;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("Flathub request failed: {0}")]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no flake.nix in {}; point apm at your flake with 'apm set-location'", .0.display())]
    NoFlake(PathBuf),
}
