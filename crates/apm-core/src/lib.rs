//! Core library for apm.
//!
//! The engine edits the user's flake tree as text: it finds a named list
//! block or brace section by line and bracket scanning, splices one line in
//! or out, and rewrites the whole file. Nothing outside the touched block is
//! reformatted. Remote lookups (Flathub, nixpkgs release discovery) live
//! here too so the CLI only wires collaborators together.

pub mod channel;
pub mod edit;
pub mod flake;
pub mod flathub;
pub mod paths;
pub mod prompt;
pub mod remote;
pub mod reporter;
pub mod tree;

pub use edit::{EditError, InsertOutcome, PresenceTest, SectionOutcome};
pub use paths::*;
pub use prompt::{AssumeYes, Prompter};
pub use remote::RemoteError;
pub use reporter::{NullReporter, Reporter};

/// User Agent string for outbound requests
pub const USER_AGENT: &str = concat!("apm/", env!("CARGO_PKG_VERSION"));
