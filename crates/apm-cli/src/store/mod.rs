//! Persisted state: the package index and the stored tree location.

pub mod index;
pub mod location;

pub use index::{IndexError, PackageIndex};
