//! Top-level flake sections: the `inputs = { ... }` map and the
//! `modules = [ ... ]` list.
//!
//! Both inserts ask the [`Prompter`] before writing. A lookup that fails,
//! or an entry that is already there, never prompts.

use std::path::Path;

use apm_schema::InputDecl;

use super::block::{locate, splice};
use super::{EditError, Miss, indent_of, read_file, strip_comment, write_file};
use crate::prompt::Prompter;

/// Label of the flake inputs map.
pub const INPUTS_LABEL: &str = "inputs = {";

/// Label of the NixOS modules list.
pub const MODULES_LABEL: &str = "modules = [";

/// Result of a section insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    Added,
    AlreadyPresent,
    /// The user declined the confirmation; nothing was written.
    Cancelled,
}

/// Byte range of a brace section: from the end of its label to its closing `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bounds {
    body_start: usize,
    close: usize,
}

/// Find `label` on an uncommented line and count braces from just after it
/// until the depth returns to zero. Braces inside strings and comments are
/// ignored.
fn section_bounds(content: &str, label: &str) -> Result<Bounds, Miss> {
    let mut offset = 0;
    let mut label_end = None;
    for line in content.split('\n') {
        if let Some(col) = strip_comment(line).find(label) {
            label_end = Some(offset + col + label.len());
            break;
        }
        offset += line.len() + 1;
    }
    let body_start = label_end.ok_or(Miss("label not present"))?;

    let mut depth = label.matches('{').count() as i64;
    let mut in_string = false;
    let mut in_comment = false;
    let mut prev = '\0';
    for (idx, ch) in content[body_start..].char_indices() {
        match ch {
            '\n' => in_comment = false,
            _ if in_comment => {}
            '"' if prev != '\\' => in_string = !in_string,
            _ if in_string => {}
            '#' => in_comment = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Bounds {
                        body_start,
                        close: body_start + idx,
                    });
                }
            }
            _ => {}
        }
        prev = ch;
    }
    Err(Miss("unbalanced braces"))
}

/// New content with `key.url = "value";` and `extra_lines` added before the
/// closing brace of the section, or `None` when `key.url` already occurs.
pub fn map_entry_in(
    content: &str,
    label: &str,
    key: &str,
    value: &str,
    extra_lines: &[String],
) -> Result<Option<String>, Miss> {
    let needle = format!("{key}.url");
    if content
        .lines()
        .any(|line| declares(strip_comment(line), &needle))
    {
        return Ok(None);
    }

    if let Ok(decls) = inputs_in(content) {
        let nested_hit = decls
            .iter()
            .any(|d| matches!(d, InputDecl::Url { name, .. } if name == key));
        if nested_hit {
            return Ok(None);
        }
    }

    let bounds = section_bounds(content, label)?;
    let mut additions = vec![format!("{needle} = \"{value}\";")];
    additions.extend(extra_lines.iter().cloned());

    let line_start = content[..bounds.close].rfind('\n').map_or(0, |i| i + 1);
    let head = &content[line_start.max(bounds.body_start)..bounds.close];

    let mut out = String::with_capacity(content.len() + 64);
    if head.trim().is_empty() && line_start >= bounds.body_start {
        let indent = format!("{}  ", indent_of(&content[line_start..]));
        out.push_str(&content[..line_start]);
        for line in &additions {
            out.push_str(&indent);
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&content[line_start..]);
    } else {
        out.push_str(content[..bounds.close].trim_end());
        for line in &additions {
            out.push(' ');
            out.push_str(line);
        }
        out.push(' ');
        out.push_str(&content[bounds.close..]);
    }
    Ok(Some(out))
}

/// `needle` occurs in `code` as a whole attribute path (not as the tail of a
/// longer name such as `nixpkgs.url` for `pkgs.url`).
fn declares(code: &str, needle: &str) -> bool {
    code.match_indices(needle).any(|(idx, _)| {
        code[..idx]
            .chars()
            .next_back()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
    })
}

/// New content with `value` added to the list section, or `None` when
/// `value` already appears anywhere in the file.
pub fn list_entry_in(content: &str, label: &str, value: &str) -> Result<Option<String>, Miss> {
    if content.contains(value) {
        return Ok(None);
    }
    let lines: Vec<&str> = content.split('\n').collect();
    let span = locate(&lines, label)?;
    Ok(Some(splice(&lines, span, value)))
}

/// Add a map entry to the section `label` of the file at `path` after
/// confirmation.
pub fn insert_map_entry(
    path: &Path,
    label: &str,
    key: &str,
    value: &str,
    extra_lines: &[String],
    prompter: &dyn Prompter,
) -> Result<SectionOutcome, EditError> {
    let content = read_file(path)?;
    let Some(updated) = map_entry_in(&content, label, key, value, extra_lines)
        .map_err(|m| EditError::not_found(path, label, m))?
    else {
        tracing::debug!("{key}.url already declared in {}", path.display());
        return Ok(SectionOutcome::AlreadyPresent);
    };

    let question = format!("Add input '{key}' ({value}) to {}?", path.display());
    if !prompter.confirm(&question) {
        return Ok(SectionOutcome::Cancelled);
    }
    write_file(path, &updated)?;
    Ok(SectionOutcome::Added)
}

/// Add `value` to the list section `label` of the file at `path` after
/// confirmation.
pub fn insert_list_entry(
    path: &Path,
    label: &str,
    value: &str,
    prompter: &dyn Prompter,
) -> Result<SectionOutcome, EditError> {
    let content = read_file(path)?;
    let Some(updated) =
        list_entry_in(&content, label, value).map_err(|m| EditError::not_found(path, label, m))?
    else {
        return Ok(SectionOutcome::AlreadyPresent);
    };

    let question = format!("Add module '{value}' to {}?", path.display());
    if !prompter.confirm(&question) {
        return Ok(SectionOutcome::Cancelled);
    }
    write_file(path, &updated)?;
    Ok(SectionOutcome::Added)
}

fn unquote(rhs: &str) -> String {
    rhs.trim()
        .trim_end_matches(';')
        .trim()
        .trim_matches('"')
        .to_string()
}

/// Declarations inside the inputs section, in file order.
///
/// Understands the flat form (`name.url = "..."`, `a.inputs.b.follows = "..."`)
/// and one level of nesting (`name = { url = "..."; inputs.b.follows = "..."; };`).
pub fn inputs_in(content: &str) -> Result<Vec<InputDecl>, Miss> {
    let bounds = section_bounds(content, INPUTS_LABEL)?;
    let body = &content[bounds.body_start..bounds.close];

    let mut decls = Vec::new();
    let mut nested: Option<String> = None;
    for raw in body.split('\n').flat_map(|l| strip_comment(l).split(';')) {
        let code = raw.trim();
        if code.is_empty() {
            continue;
        }
        if code.starts_with('}') {
            nested = None;
            continue;
        }
        let Some((lhs, rhs)) = code.split_once('=') else {
            continue;
        };
        let lhs = lhs.trim();
        let rhs = rhs.trim();

        if rhs.starts_with('{') {
            nested = Some(lhs.to_string());
            // `name = { url = "..."; }` on one line
            let inner = rhs.trim_start_matches('{').trim();
            if let Some((ilhs, irhs)) = inner.split_once('=') {
                push_decl(&mut decls, Some(lhs), ilhs.trim(), irhs);
            }
            continue;
        }
        push_decl(&mut decls, nested.as_deref(), lhs, rhs);
    }
    Ok(decls)
}

fn push_decl(decls: &mut Vec<InputDecl>, parent: Option<&str>, lhs: &str, rhs: &str) {
    let full = match parent {
        Some(p) => format!("{p}.{lhs}"),
        None => lhs.to_string(),
    };
    if let Some(name) = full.strip_suffix(".url") {
        decls.push(InputDecl::Url {
            name: name.to_string(),
            url: unquote(rhs),
        });
    } else if let Some(name) = full.strip_suffix(".follows") {
        decls.push(InputDecl::Follows {
            name: name.to_string(),
            target: unquote(rhs),
        });
    }
}

/// Read the inputs declared in the flake at `path`.
pub fn read_inputs(path: &Path) -> Result<Vec<InputDecl>, EditError> {
    let content = read_file(path)?;
    inputs_in(&content).map_err(|m| EditError::not_found(path, INPUTS_LABEL, m))
}
