//! Unified UI output interface.
//!
//! Commands print through an [`Output`] handle. Informational lines go to
//! stdout; warnings and errors go to stderr so piped output stays clean.

use std::io::Write;

use apm_core::Reporter;
use crossterm::style::Stylize;

use super::theme::Theme;

/// Message severity for a status line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A cloneable handle for printing status lines.
#[derive(Debug, Clone, Default)]
pub struct Output {
    theme: Theme,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Format a status line without printing it.
    pub fn render(&self, severity: Severity, msg: &str) -> String {
        let icons = &self.theme.icons;
        match severity {
            Severity::Info => format!("{} {msg}", icons.info.dark_grey()),
            Severity::Success => format!("{} {}", icons.success.green(), msg.green()),
            Severity::Warning => format!("{} {}", icons.warning.yellow(), msg.yellow()),
            Severity::Error => format!("{} {}", icons.error.red(), msg.red()),
        }
    }

    fn emit(&self, severity: Severity, msg: &str) {
        let line = self.render(severity, msg);
        // A closed pipe is not worth failing a command over
        let _ = match severity {
            Severity::Info | Severity::Success => writeln!(std::io::stdout(), "{line}"),
            Severity::Warning | Severity::Error => writeln!(std::io::stderr(), "{line}"),
        };
    }

    /// Prints a visual section header for an operation phase.
    pub fn section(&self, title: &str) {
        let _ = writeln!(std::io::stdout(), "\n{}", title.bold().with(self.theme.colors.header));
    }

    pub fn info(&self, msg: &str) {
        self.emit(Severity::Info, msg);
    }

    pub fn success(&self, msg: &str) {
        self.emit(Severity::Success, msg);
    }

    pub fn warning(&self, msg: &str) {
        self.emit(Severity::Warning, msg);
    }

    pub fn error(&self, msg: &str) {
        self.emit(Severity::Error, msg);
    }

    /// Plain line on stdout, no icon.
    pub fn plain(&self, msg: &str) {
        let _ = writeln!(std::io::stdout(), "{msg}");
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        Output::section(self, title);
    }
    fn info(&self, msg: &str) {
        Output::info(self, msg);
    }
    fn success(&self, msg: &str) {
        Output::success(self, msg);
    }
    fn warning(&self, msg: &str) {
        Output::warning(self, msg);
    }
    fn error(&self, msg: &str) {
        Output::error(self, msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_message_text() {
        let out = Output::new();
        for severity in [
            Severity::Info,
            Severity::Success,
            Severity::Warning,
            Severity::Error,
        ] {
            let line = out.render(severity, "3 files updated");
            assert!(line.contains("3 files updated"));
        }
        assert!(out.render(Severity::Error, "x").contains('✗'));
    }
}
