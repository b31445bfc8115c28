use dirs::home_dir;
use std::path::{Path, PathBuf};

/// Tree location used when none has been stored yet.
pub const DEFAULT_FLAKE_LOCATION: &str = "/etc/nixos";

/// Returns the `APM_HOME` override, if set.
fn apm_home_override() -> Option<PathBuf> {
    std::env::var_os("APM_HOME").map(PathBuf::from)
}

/// Returns the configuration directory (`~/.config/apm`), or None if the
/// user's home cannot be resolved.
pub fn try_config_dir() -> Option<PathBuf> {
    if let Some(home) = apm_home_override() {
        return Some(home.join("config"));
    }
    home_dir().map(|h| h.join(".config").join("apm"))
}

/// Returns the cache directory (`~/.cache/apm`), or None if the user's home
/// cannot be resolved.
pub fn try_cache_dir() -> Option<PathBuf> {
    if let Some(home) = apm_home_override() {
        return Some(home.join("cache"));
    }
    home_dir().map(|h| h.join(".cache").join("apm"))
}

/// File holding the absolute path of the flake tree: `<config>/flakelocation.txt`
pub fn location_file(config_dir: &Path) -> PathBuf {
    config_dir.join("flakelocation.txt")
}

/// `SQLite` package index: `<cache>/apm.db`
pub fn index_db_path(cache_dir: &Path) -> PathBuf {
    cache_dir.join("apm.db")
}

/// The flake entry point inside a tree: `<tree>/flake.nix`
pub fn flake_path(tree: &Path) -> PathBuf {
    tree.join("flake.nix")
}

/// Directory that receives bootstrapped package files: `<tree>/packages`
pub fn packages_dir(tree: &Path) -> PathBuf {
    tree.join("packages")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_paths() {
        let tree = Path::new("/etc/nixos");
        assert_eq!(flake_path(tree), PathBuf::from("/etc/nixos/flake.nix"));
        assert_eq!(packages_dir(tree), PathBuf::from("/etc/nixos/packages"));
        assert_eq!(
            index_db_path(Path::new("/tmp/cache")),
            PathBuf::from("/tmp/cache/apm.db")
        );
    }
}
