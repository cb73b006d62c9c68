//! Markdown rendering of errors for the terminal.

use std::fmt::Write as _;

use crate::error::Error;
use crate::types::Kind;

/// ANSI bold, applied to headings.
const BOLD: &str = "\x1b[1m";
/// ANSI reset.
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened and,
/// where there is one, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::UnknownKind { label } => render_unknown_kind(label),
        Error::InvalidSpan { start, end, len } => render_invalid_span(*start, *end, *len),
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::Store { reason } => format!("\
# Error: Store Failed

The sink refused a reference: {reason}
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}

## Fix

Correct the syntax in `.doclink.toml`.
"),
    }
}

/// Unknown kind label, with a suggestion and the list of known kinds.
fn render_unknown_kind(label: &str) -> String {
    let mut out = format!("\
# Error: Unknown Kind

`{label}` is not a known kind.
");

    if let Some(suggestion) = find_closest_kind(label) {
        let _ = write!(out, "\n## Did you mean `{suggestion}`?\n");
    }

    out.push_str("\n## Known kinds\n\n");
    for kind in Kind::ALL {
        let _ = writeln!(out, "- `{kind}`");
    }
    out
}

/// Match ignoring case and `_`/`-`/space separators, so `xml_element` finds
/// `xml element`.
fn find_closest_kind(label: &str) -> Option<Kind> {
    let normalized = normalize_label(label);
    Kind::ALL.into_iter().find(|k| normalize_label(k.label()) == normalized)
}

/// Lower-cased label without separators.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Span that does not slice the scanned text.
fn render_invalid_span(start: usize, end: usize, len: usize) -> String {
    format!(
        "\
# Error: Invalid Span

A strategy reported bytes {start}..{end} of a {len}-byte text.
Spans must be ordered, in bounds, and on character boundaries.

No references were stored for this text.
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_suggests_normalized_label() {
        let md = render_error(&Error::UnknownKind { label: "XML_Element".to_string() });
        assert!(md.starts_with("# Error: Unknown Kind"));
        assert!(md.contains("## Did you mean `xml element`?"));
        assert!(md.contains("- `method parameter`"));
    }

    #[test]
    fn unknown_kind_without_close_match_lists_kinds_only() {
        let md = render_error(&Error::UnknownKind { label: "widget".to_string() });
        assert!(!md.contains("Did you mean"));
        assert!(md.contains("## Known kinds"));
    }

    #[test]
    fn invalid_span_names_the_range() {
        let md = render_error(&Error::InvalidSpan { start: 3, end: 40, len: 5 });
        assert!(md.contains("bytes 3..40 of a 5-byte text"));
    }
}
