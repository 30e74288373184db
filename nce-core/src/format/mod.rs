//! Line-oriented text formats that populate the engine.
//!
//! Both formats share the same skeleton: UTF-8 lines, blank lines and
//! `#` comments ignored, `@section <name>` switching the current section,
//! and `|`-separated fields with `key:value` attributes.
//!
//! - [`brain`]: the concept graph (`nodes`, `edges`, `responses`).
//! - [`nol`]: vocabulary and response templates.

pub mod brain;
pub mod nol;

use crate::error::{NceError, Result};

/// One meaningful line of a sectioned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `@section <name>`, name lower-cased.
    Section(String),
    /// Any other non-blank, non-comment line, trimmed.
    Entry(&'a str),
}

/// Split `src` into numbered section headers and entries.
///
/// # Errors
/// Returns `NceError::Parse` for an `@section` header without a name.
pub(crate) fn scan<'a>(src: &'a str, file: &str) -> Result<Vec<(usize, Line<'a>)>> {
    let mut out = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with("@section") {
            let name = line
                .split_once(char::is_whitespace)
                .map(|(_, rest)| rest.trim().to_lowercase())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| NceError::Parse {
                    file: file.to_string(),
                    line: idx + 1,
                    message: "section header without a name".into(),
                })?;
            out.push((idx + 1, Line::Section(name)));
            continue;
        }
        out.push((idx + 1, Line::Entry(line)));
    }
    Ok(out)
}

/// `|`-separated fields, each trimmed.
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

/// Comma-separated list with empty items dropped.
pub(crate) fn list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
