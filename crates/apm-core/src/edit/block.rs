//! List blocks (`label = [ ... ];`).
//!
//! A block starts at the first line whose code contains the label. Its
//! opening `[` is on that line, or starts the next line carrying any code;
//! the closing `]` is the first one after that. Entries are the trimmed,
//! comment-stripped lines strictly inside, plus whatever shares a line with
//! either bracket.

use std::path::Path;

use apm_schema::InstallationMethod;

use super::{EditError, Miss, indent_of, read_file, strip_comment, write_file};

/// Result of [`insert_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    AlreadyPresent,
}

/// Result of [`remove_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoveOutcome {
    /// Entry lines deleted.
    pub removed: usize,
    /// Matching entries left alone because they share a line with a bracket
    /// or with other entries.
    pub shared: usize,
}

/// How an insert decides that the entry is already in the block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceTest {
    /// An entry line equals the new entry, or one of its whitespace-separated
    /// tokens does.
    Exact,
    /// An entry line contains the new entry, or mentions `appId` and the id.
    /// Loose on purpose: an id that is a substring of another id matches.
    AppId(String),
}

impl PresenceTest {
    pub fn for_method(method: InstallationMethod, name: &str) -> Self {
        match method {
            InstallationMethod::SandboxedApp => Self::AppId(name.to_string()),
            InstallationMethod::SystemWide | InstallationMethod::PerUserProfile => Self::Exact,
        }
    }

    pub fn matches(&self, entry: &str, existing: &str) -> bool {
        match self {
            Self::Exact => {
                existing.trim() == entry || existing.split_whitespace().any(|tok| tok == entry)
            }
            Self::AppId(id) => {
                existing.contains(entry) || (existing.contains("appId") && existing.contains(id))
            }
        }
    }
}

/// Line/column coordinates of a block's delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) open: usize,
    pub(crate) open_col: usize,
    pub(crate) close: usize,
    pub(crate) close_col: usize,
}

#[derive(Debug)]
struct EntryLine {
    line: usize,
    text: String,
    own_line: bool,
}

pub(crate) fn locate(lines: &[&str], label: &str) -> Result<Span, Miss> {
    let (label_line, label_col) = lines
        .iter()
        .enumerate()
        .find_map(|(i, l)| strip_comment(l).find(label).map(|c| (i, c)))
        .ok_or(Miss("label not present"))?;

    let (open, open_col) =
        if let Some(c) = strip_comment(lines[label_line])[label_col..].find('[') {
            (label_line, label_col + c)
        } else {
            let mut found = None;
            for (i, line) in lines.iter().enumerate().skip(label_line + 1) {
                let code = strip_comment(line);
                if code.trim().is_empty() {
                    continue;
                }
                let trimmed = code.trim_start();
                if trimmed.starts_with('[') {
                    found = Some((i, code.len() - trimmed.len()));
                }
                break;
            }
            found.ok_or(Miss("no opening bracket after label"))?
        };

    let (close, close_col) =
        if let Some(c) = strip_comment(lines[open])[open_col + 1..].find(']') {
            (open, open_col + 1 + c)
        } else {
            lines
                .iter()
                .enumerate()
                .skip(open + 1)
                .find_map(|(i, l)| strip_comment(l).find(']').map(|c| (i, c)))
                .ok_or(Miss("no closing bracket"))?
        };

    Ok(Span {
        open,
        open_col,
        close,
        close_col,
    })
}

fn entry_lines(lines: &[&str], span: Span) -> Vec<EntryLine> {
    let mut out = Vec::new();
    let mut push = |line: usize, text: &str, own_line: bool| {
        let text = text.trim();
        if !text.is_empty() {
            out.push(EntryLine {
                line,
                text: text.to_string(),
                own_line,
            });
        }
    };

    if span.open == span.close {
        push(
            span.open,
            &lines[span.open][span.open_col + 1..span.close_col],
            false,
        );
        return out;
    }

    push(
        span.open,
        strip_comment(&lines[span.open][span.open_col + 1..]),
        false,
    );
    for (i, line) in lines.iter().enumerate().take(span.close).skip(span.open + 1) {
        push(i, strip_comment(line), true);
    }
    push(span.close, &lines[span.close][..span.close_col], false);
    out
}

/// Insert `text` just before the closing bracket of `span`.
///
/// When the bracket starts its own line the text becomes a new line indented
/// like the last entry (or two spaces deeper than the bracket). Otherwise it
/// is placed inline before the bracket.
pub(crate) fn splice(lines: &[&str], span: Span, text: &str) -> String {
    let close_line = lines[span.close];
    let head_start = if span.open == span.close {
        span.open_col + 1
    } else {
        0
    };
    let inline = span.open == span.close || !close_line[head_start..span.close_col].trim().is_empty();

    let mut out: Vec<String> = lines.iter().map(|l| (*l).to_string()).collect();
    if inline {
        let before = close_line[..span.close_col].trim_end();
        out[span.close] = format!("{before} {text} {}", &close_line[span.close_col..]);
    } else {
        let indent = lines[span.open + 1..span.close]
            .iter()
            .rev()
            .find(|l| !strip_comment(l).trim().is_empty())
            .map_or_else(
                || format!("{}  ", indent_of(close_line)),
                |l| indent_of(l).to_string(),
            );
        out.insert(span.close, format!("{indent}{text}"));
    }
    out.join("\n")
}

/// Entries of the block labelled `label` in `content`.
pub fn entries_in(content: &str, label: &str) -> Result<Vec<String>, Miss> {
    let lines: Vec<&str> = content.split('\n').collect();
    let span = locate(&lines, label)?;
    Ok(entry_lines(&lines, span)
        .into_iter()
        .map(|e| e.text)
        .collect())
}

/// New content with `entry` appended to the block, or `None` when `test`
/// finds it already there.
pub fn insert_in(
    content: &str,
    label: &str,
    entry: &str,
    test: &PresenceTest,
) -> Result<Option<String>, Miss> {
    let lines: Vec<&str> = content.split('\n').collect();
    let span = locate(&lines, label)?;
    if entry_lines(&lines, span)
        .iter()
        .any(|e| test.matches(entry, &e.text))
    {
        return Ok(None);
    }
    Ok(Some(splice(&lines, span, entry)))
}

/// New content with every own-line entry matching `pred` deleted, or `None`
/// when nothing was deleted.
///
/// `pred` judges a whole entry. A line where only one whitespace-separated
/// token matches is counted as shared and kept.
pub fn remove_in(
    content: &str,
    label: &str,
    pred: impl Fn(&str) -> bool,
) -> Result<(Option<String>, RemoveOutcome), Miss> {
    let lines: Vec<&str> = content.split('\n').collect();
    let span = locate(&lines, label)?;

    let mut outcome = RemoveOutcome::default();
    let mut drop = Vec::new();
    for entry in entry_lines(&lines, span) {
        let whole = pred(&entry.text);
        if whole && entry.own_line {
            drop.push(entry.line);
            outcome.removed += 1;
        } else if whole || entry.text.split_whitespace().any(|tok| pred(tok)) {
            outcome.shared += 1;
        }
    }

    if drop.is_empty() {
        return Ok((None, outcome));
    }
    let kept: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !drop.contains(i))
        .map(|(_, l)| *l)
        .collect();
    Ok((Some(kept.join("\n")), outcome))
}

/// Read the entries of block `label` in the file at `path`.
pub fn read_entries(path: &Path, label: &str) -> Result<Vec<String>, EditError> {
    let content = read_file(path)?;
    entries_in(&content, label).map_err(|m| EditError::not_found(path, label, m))
}

/// Append `entry` to block `label` in the file at `path` unless `test` finds
/// it already present. Writes only on [`InsertOutcome::Added`].
pub fn insert_entry(
    path: &Path,
    label: &str,
    entry: &str,
    test: &PresenceTest,
) -> Result<InsertOutcome, EditError> {
    let content = read_file(path)?;
    match insert_in(&content, label, entry, test).map_err(|m| EditError::not_found(path, label, m))? {
        Some(updated) => {
            write_file(path, &updated)?;
            Ok(InsertOutcome::Added)
        }
        None => Ok(InsertOutcome::AlreadyPresent),
    }
}

/// Delete own-line entries of block `label` matching `pred`.
pub fn remove_entry(
    path: &Path,
    label: &str,
    pred: impl Fn(&str) -> bool,
) -> Result<RemoveOutcome, EditError> {
    let content = read_file(path)?;
    let (updated, outcome) =
        remove_in(&content, label, pred).map_err(|m| EditError::not_found(path, label, m))?;
    if let Some(updated) = updated {
        write_file(path, &updated)?;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HOME: &str = "home.packages";

    const MULTI: &str = "{ pkgs, ... }:\n{\n  # editor\n  home.packages = [\n    pkgs.git # vcs\n    pkgs.ripgrep\n\n    pkgs.fd\n  ];\n  programs.bash.enable = true;\n}\n";

    #[test]
    fn test_entries_strip_comments_and_blanks() {
        let entries = entries_in(MULTI, HOME).unwrap();
        assert_eq!(entries, vec!["pkgs.git", "pkgs.ripgrep", "pkgs.fd"]);
    }

    #[test]
    fn test_entries_on_delimiter_lines() {
        let text = "home.packages = [ pkgs.a\n  pkgs.b\n  pkgs.c ];\n";
        assert_eq!(
            entries_in(text, HOME).unwrap(),
            vec!["pkgs.a", "pkgs.b", "pkgs.c"]
        );
        let single = "  home.packages = [ pkgs.a ]; # one liner\n";
        assert_eq!(entries_in(single, HOME).unwrap(), vec!["pkgs.a"]);
    }

    #[test]
    fn test_bracket_on_later_line() {
        let text = "environment.systemPackages =\n\n  [\n    pkgs.htop\n  ];\n";
        assert_eq!(
            entries_in(text, "environment.systemPackages").unwrap(),
            vec!["pkgs.htop"]
        );
    }

    #[test]
    fn test_missing_delimiters_are_misses() {
        assert_eq!(
            entries_in("foo = [ ];", HOME),
            Err(Miss("label not present"))
        );
        assert_eq!(
            entries_in("home.packages = with pkgs;\n  lib.concat [ a ];", HOME),
            Err(Miss("no opening bracket after label"))
        );
        assert_eq!(
            entries_in("home.packages = [\n  pkgs.a\n", HOME),
            Err(Miss("no closing bracket"))
        );
    }

    #[test]
    fn test_later_line_must_open_with_bracket() {
        let text = "home.packages = with pkgs;\n  lib.concat [ a ];\n";
        assert_eq!(
            insert_in(text, HOME, "pkgs.b", &PresenceTest::Exact),
            Err(Miss("no opening bracket after label"))
        );
        let comment_between = "home.packages =\n  # tools\n  [ pkgs.a ];\n";
        assert_eq!(entries_in(comment_between, HOME).unwrap(), vec!["pkgs.a"]);
    }

    #[test]
    fn test_commented_label_ignored() {
        let text = "# home.packages = [ pkgs.old ];\nhome.packages = [\n  pkgs.new\n];\n";
        assert_eq!(entries_in(text, HOME).unwrap(), vec!["pkgs.new"]);
    }

    #[test]
    fn test_insert_appends_last_with_entry_indent() {
        let updated = insert_in(MULTI, HOME, "pkgs.bat", &PresenceTest::Exact)
            .unwrap()
            .unwrap();
        assert!(updated.contains("    pkgs.fd\n    pkgs.bat\n  ];"));
        assert_eq!(
            entries_in(&updated, HOME).unwrap(),
            vec!["pkgs.git", "pkgs.ripgrep", "pkgs.fd", "pkgs.bat"]
        );
    }

    #[test]
    fn test_insert_does_not_touch_outside_block() {
        let updated = insert_in(MULTI, HOME, "pkgs.bat", &PresenceTest::Exact)
            .unwrap()
            .unwrap();
        let close = MULTI.find("  ];").unwrap();
        let inserted = "    pkgs.bat\n";
        assert_eq!(&updated[..close], &MULTI[..close]);
        assert_eq!(&updated[close + inserted.len()..], &MULTI[close..]);
    }

    #[test]
    fn test_insert_into_empty_single_line_block() {
        let updated = insert_in("home.packages = [ ];\n", HOME, "pkgs.firefox", &PresenceTest::Exact)
            .unwrap()
            .unwrap();
        assert_eq!(updated, "home.packages = [ pkgs.firefox ];\n");
    }

    #[test]
    fn test_insert_into_empty_multi_line_block() {
        let text = InstallationMethod::SystemWide.boilerplate();
        let updated = insert_in(
            &text,
            "environment.systemPackages",
            "pkgs.htop",
            &PresenceTest::Exact,
        )
        .unwrap()
        .unwrap();
        assert!(updated.contains("  environment.systemPackages = [\n    pkgs.htop\n  ];"));
    }

    #[test]
    fn test_inline_presence_detected() {
        let text = "home.packages = [ pkgs.git pkgs.vim ];";
        assert_eq!(
            insert_in(text, HOME, "pkgs.vim", &PresenceTest::Exact).unwrap(),
            None
        );
    }

    #[test]
    fn test_flatpak_presence_by_app_id() {
        let text = "services.flatpak.packages = [\n  { appId = \"org.gimp.GIMP\"; origin = \"flathub\"; }\n];";
        let entry = InstallationMethod::SandboxedApp.entry_for("org.gimp.GIMP", false);
        let test = PresenceTest::for_method(InstallationMethod::SandboxedApp, "org.gimp.GIMP");
        assert_eq!(
            insert_in(text, "services.flatpak.packages", &entry, &test).unwrap(),
            None
        );

        let multi = "services.flatpak.packages = [\n  {\n    appId = \"org.gimp.GIMP\";\n  }\n];";
        assert_eq!(
            insert_in(multi, "services.flatpak.packages", &entry, &test).unwrap(),
            None
        );
    }

    #[test]
    fn test_insert_entry_is_idempotent_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("home.nix");
        fs::write(&path, MULTI).unwrap();

        let first = insert_entry(&path, HOME, "pkgs.jq", &PresenceTest::Exact).unwrap();
        let after_first = fs::read_to_string(&path).unwrap();
        let second = insert_entry(&path, HOME, "pkgs.jq", &PresenceTest::Exact).unwrap();

        assert_eq!(first, InsertOutcome::Added);
        assert_eq!(second, InsertOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_insert_entry_not_found_leaves_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.nix");
        fs::write(&path, "{ networking.hostName = \"box\"; }\n").unwrap();

        let err = insert_entry(&path, HOME, "pkgs.jq", &PresenceTest::Exact).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{ networking.hostName = \"box\"; }\n"
        );
    }

    #[test]
    fn test_read_entries_missing_file_is_io() {
        let dir = tempdir().unwrap();
        let err = read_entries(&dir.path().join("nope.nix"), HOME).unwrap_err();
        assert!(matches!(err, EditError::Io { .. }));
    }

    #[test]
    fn test_remove_own_line_entry() {
        let (updated, outcome) = remove_in(MULTI, HOME, |e| e == "pkgs.ripgrep").unwrap();
        let updated = updated.unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(entries_in(&updated, HOME).unwrap(), vec!["pkgs.git", "pkgs.fd"]);
        assert!(updated.contains("programs.bash.enable = true;"));
    }

    #[test]
    fn test_remove_skips_shared_line() {
        let text = "home.packages = [ pkgs.git ];";
        let (updated, outcome) = remove_in(text, HOME, |e| e == "pkgs.git").unwrap();
        assert!(updated.is_none());
        assert_eq!(outcome, RemoveOutcome { removed: 0, shared: 1 });

        let own_line = "home.packages = [\n  pkgs.git pkgs.vim\n  pkgs.vim\n];";
        let (updated, outcome) = remove_in(own_line, HOME, |e| e == "pkgs.vim").unwrap();
        assert_eq!(outcome, RemoveOutcome { removed: 1, shared: 1 });
        assert_eq!(updated.unwrap(), "home.packages = [\n  pkgs.git pkgs.vim\n];");
    }
}
