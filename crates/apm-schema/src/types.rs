//! Records and input declarations shared across the workspace.

use serde::{Deserialize, Serialize};

/// One package known to the local index (or returned by the remote directory).
///
/// Records are created in bulk when the cache is rebuilt and are read-only
/// afterwards. `name` is unique within one index snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Attribute name used in configuration entries (e.g. "firefox").
    pub name: String,

    /// Upstream version string; empty when the source does not report one.
    #[serde(default)]
    pub version: String,

    /// One-line summary.
    #[serde(default)]
    pub description: String,
}

impl PackageRecord {
    /// Create a record from its three fields.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }

    /// Accessor used by the ranking utility.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A declared flake input (`name.url = "..."` or `name.follows = "..."`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputDecl {
    /// `name.url = "url";`
    Url {
        /// Input name.
        name: String,
        /// Flake reference.
        url: String,
    },
    /// `name.follows = "target";` (including nested `a.inputs.b.follows`).
    Follows {
        /// Left-hand side without the `.follows` suffix.
        name: String,
        /// Followed input.
        target: String,
    },
}
