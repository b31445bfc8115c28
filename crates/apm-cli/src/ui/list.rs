//! Table formatting for `list`, `search` and `list-inputs`.

use apm_schema::{InputDecl, PackageRecord};
use crossterm::style::Stylize;

use super::theme::{Theme, truncate};

/// One row of a search result table: name, version and description.
pub fn record_row(theme: &Theme, record: &PackageRecord) -> String {
    let name_part = format!("{: <width$}", record.name, width = theme.layout.name_width);
    let version_part = format!(
        "{: <width$}",
        record.version,
        width = theme.layout.version_width
    );
    let description = truncate(&record.description, theme.layout.description_width);
    format!(
        "  {} {} {}",
        name_part.with(theme.colors.package_name),
        version_part.with(theme.colors.version),
        description.with(theme.colors.secondary)
    )
}

/// One row of a declared-entries table: the entry and the file that holds it.
pub fn entry_row(theme: &Theme, entry: &str, file: &str) -> String {
    let entry_part = format!("{entry: <width$}", width = theme.layout.name_width);
    format!(
        "  {} {}",
        entry_part.with(theme.colors.package_name),
        file.with(theme.colors.secondary)
    )
}

/// One row of the inputs table.
pub fn input_row(theme: &Theme, input: &InputDecl) -> String {
    let (name, detail) = match input {
        InputDecl::Url { name, url } => (name.as_str(), url.clone()),
        InputDecl::Follows { name, target } => (name.as_str(), format!("follows {target}")),
    };
    let name_part = format!("{name: <width$}", width = theme.layout.name_width);
    format!(
        "  {} {}",
        name_part.with(theme.colors.package_name),
        detail.with(theme.colors.secondary)
    )
}

/// Dim summary line printed under a table.
pub fn footer(count: usize, noun: &str) -> String {
    let plural = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{plural}").dark_grey().to_string()
}
