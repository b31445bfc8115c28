//! Tree-level operations shared by the `add` and `remove` commands.

pub mod context;
pub mod error;
pub mod install;
pub mod remove;

pub use context::Context;
pub use error::InstallError;
