//! The stored path of the user's flake tree.

use std::path::{Path, PathBuf};

use apm_core::paths::{DEFAULT_FLAKE_LOCATION, location_file};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocationError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("location file {} is empty", .0.display())]
    Empty(PathBuf),
}

fn io(path: &Path) -> impl FnOnce(std::io::Error) -> LocationError + '_ {
    move |source| LocationError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the stored tree path, writing the default first if none exists yet.
pub fn load_or_init(config_dir: &Path) -> Result<PathBuf, LocationError> {
    let file = location_file(config_dir);
    match std::fs::read_to_string(&file) {
        Ok(content) => {
            let stored = content.trim();
            if stored.is_empty() {
                return Err(LocationError::Empty(file));
            }
            Ok(PathBuf::from(stored))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no stored location, defaulting to {DEFAULT_FLAKE_LOCATION}");
            let default = PathBuf::from(DEFAULT_FLAKE_LOCATION);
            write(&file, &default)?;
            Ok(default)
        }
        Err(e) => Err(io(&file)(e)),
    }
}

/// Store `path` as the tree location, made absolute first.
pub fn store(config_dir: &Path, path: &Path) -> Result<PathBuf, LocationError> {
    let absolute = std::path::absolute(path).map_err(io(path))?;
    write(&location_file(config_dir), &absolute)?;
    Ok(absolute)
}

fn write(file: &Path, location: &Path) -> Result<(), LocationError> {
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent).map_err(io(parent))?;
    }
    std::fs::write(file, format!("{}\n", location.display())).map_err(io(file))
}
