//! Provenance lookup: the sentence and paragraph around a span.
//!
//! Both lookups are pure and always return a slice of the input that
//! contains the span itself.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// A blank line, possibly holding only spaces, tabs, or carriage returns.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r]*\n").expect("valid regex"));

/// Sentence terminator followed by whitespace or the end of the paragraph.
/// `Foo.bar` does not end a sentence.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?](?:\s+|$)").expect("valid regex"));

/// Terminator that closes the previous sentence. Needs real whitespace after
/// it: the text before a span ends where the span starts, not where the
/// paragraph ends, so `$` would turn the dot in `Session.save` into a break.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static SENTENCE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

/// Non-blank paragraphs of `text`, in order.
pub fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    BLANK_LINE_RE.split(text).map(str::trim).filter(|p| !p.is_empty())
}

/// Smallest blank-line-delimited block enclosing `span`.
///
/// `span` must lie on character boundaries inside `text`; otherwise the
/// result is empty.
pub fn find_paragraph(text: &str, span: Range<usize>) -> &str {
    let (start, end) = paragraph_bounds(text, &span);
    trim_around(text, start, end, &span)
}

/// Smallest sentence enclosing `span`. Sentences never cross paragraphs.
///
/// `span` must lie on character boundaries inside `text`; otherwise the
/// result is empty.
pub fn find_sentence(text: &str, span: Range<usize>) -> &str {
    let (para_start, para_end) = paragraph_bounds(text, &span);

    let start = SENTENCE_BREAK_RE
        .find_iter(slice(text, para_start, span.start))
        .last()
        .map_or(para_start, |m| para_start.saturating_add(m.end()));

    // Keep the terminator itself in the sentence.
    let end = SENTENCE_END_RE
        .find(slice(text, span.end, para_end))
        .map_or(para_end, |m| span.end.saturating_add(m.start()).saturating_add(1));

    trim_around(text, start, end, &span)
}

/// Byte bounds of the paragraph holding `span`, untrimmed.
fn paragraph_bounds(text: &str, span: &Range<usize>) -> (usize, usize) {
    let start = BLANK_LINE_RE
        .find_iter(slice(text, 0, span.start))
        .last()
        .map_or(0, |m| m.end());
    let end = BLANK_LINE_RE
        .find(slice(text, span.end, text.len()))
        .map_or(text.len(), |m| span.end.saturating_add(m.start()));
    (start, end)
}

/// Trim whitespace from `text[start..end]` without eating into `span`.
fn trim_around<'a>(text: &'a str, start: usize, end: usize, span: &Range<usize>) -> &'a str {
    let head = slice(text, start, span.start);
    let start = start.saturating_add(head.len().saturating_sub(head.trim_start().len()));
    let tail = slice(text, span.end, end);
    let end = span.end.saturating_add(tail.trim_end().len());
    slice(text, start, end)
}

/// `text[start..end]`, or empty when the range does not slice `text`.
fn slice(text: &str, start: usize, end: usize) -> &str {
    text.get(start..end).unwrap_or_default()
}
