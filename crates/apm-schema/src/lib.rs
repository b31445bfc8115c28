//! Shared types for apm.
//!
//! Everything here is plain data: the records kept in the local package
//! index, the closed set of installation methods and the configuration
//! blocks they map to, and the relevance ranking shared by the local index
//! and the remote application directory.

pub mod method;
pub mod rank;
pub mod types;

// Re-exports
pub use method::{InstallationMethod, MethodError, bare_name};
pub use rank::{MAX_RESULTS, rank_by_relevance};
pub use types::*;

/// Extension of files the engine reads and edits inside the configuration tree.
pub const CONFIG_EXTENSION: &str = "nix";
