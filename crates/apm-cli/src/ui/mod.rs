//! Terminal presentation: colours, message lines and tables.

pub mod list;
pub mod output;
pub mod prompt;
pub mod theme;

pub use output::Output;
pub use prompt::StdinPrompter;
pub use theme::Theme;
