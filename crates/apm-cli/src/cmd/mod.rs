//! One module per `apm` subcommand.

pub mod add;
pub mod cache;
pub mod inputs;
pub mod list;
pub mod location;
pub mod remove;
pub mod search;
pub mod system;
pub mod version;
