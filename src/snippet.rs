//! Notation detection for code blocks and mailing-list paragraphs.
//!
//! Code blocks are tested for XML shape first and Java shape second; the
//! order matters because well-formed XML with trailing semicolons satisfies
//! both tests. Paragraph classification runs an ordered list of line-level
//! predicates and takes the first that matches.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sink::Sink;

/// Language or role of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notation {
    /// Java stack trace.
    ExceptionTrace,
    /// Java source.
    Java,
    /// Log output.
    Log,
    /// Nothing more specific.
    Other,
    /// Quoted or boilerplate text from an earlier message.
    Reply,
    /// Marks where the quoted remainder of a message starts.
    Stop,
    /// XML markup.
    Xml,
}

impl Notation {
    /// Snake-case label, as serialized.
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExceptionTrace => "exception_trace",
            Self::Java => "java",
            Self::Log => "log",
            Self::Other => "other",
            Self::Reply => "reply",
            Self::Stop => "stop",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified code block, as handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// Detected notation.
    pub language: Notation,
    /// The block as given.
    pub snippet_text: String,
}

/// Rejects text that only superficially looks like a notation.
pub trait SnippetFilter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// `true` when `text` must not be classified as the filtered notation.
    fn suppresses(&self, text: &str) -> bool;
}

/// Leading keywords of a DML or DDL statement.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static SQL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^\s*(?:select\s.+\sfrom\s|insert\s+into\s|update\s+\w+\s+set\s|delete\s+from\s|(?:create|drop)\s+(?:table|index|view|sequence)\s|alter\s+table\s)",
    )
    .expect("valid regex")
});

/// A line that continues a fluent chain: `.addClass(Cat.class)`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static BUILDER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.[A-Za-z_][\w$]*\(").expect("valid regex"));

/// `).name(` links between chained calls.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static CHAIN_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\s*\.\s*[A-Za-z_][\w$]*\(").expect("valid regex"));

/// SQL statements, which end in `;` and read like Java to the line test.
pub struct SqlFilter;

impl SnippetFilter for SqlFilter {
    fn name(&self) -> &'static str {
        "sql"
    }

    fn suppresses(&self, text: &str) -> bool {
        SQL_RE.is_match(text)
    }
}

/// Unterminated fluent builder chains quoted out of a larger statement.
pub struct BuilderFilter;

impl SnippetFilter for BuilderFilter {
    fn name(&self) -> &'static str {
        "builder"
    }

    fn suppresses(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.ends_with(';') {
            return false;
        }
        let lines = non_blank_lines(trimmed);
        lines.iter().all(|l| BUILDER_LINE_RE.is_match(l)) || CHAIN_LINK_RE.find_iter(trimmed).count() >= 2
    }
}

/// Suppression filters registered per notation.
pub struct Filters {
    /// Filters applied before accepting each notation.
    by_notation: HashMap<Notation, Vec<Box<dyn SnippetFilter>>>,
}

impl Filters {
    /// No filters for any notation.
    pub fn empty() -> Self {
        Self { by_notation: HashMap::new() }
    }

    /// Register the filters for `notation`.
    #[must_use]
    pub fn with(mut self, notation: Notation, filters: Vec<Box<dyn SnippetFilter>>) -> Self {
        self.by_notation.insert(notation, filters);
        self
    }

    /// Filters for `notation`; empty when none are registered.
    pub fn for_notation(&self, notation: Notation) -> &[Box<dyn SnippetFilter>] {
        self.by_notation.get(&notation).map(Vec::as_slice).unwrap_or_default()
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::empty()
            .with(Notation::Java, vec![Box::new(SqlFilter), Box::new(BuilderFilter)])
            .with(Notation::Xml, Vec::new())
            .with(Notation::Other, Vec::new())
    }
}

/// Classify a code block and hand the result to `sink`.
///
/// Returns `None` when the snippet could not be stored; the failure is logged.
/// `None` means "classification failed", never "other".
pub fn classify_code_snippet(text: &str, filters: &Filters, sink: &mut dyn Sink) -> Option<CodeSnippet> {
    let language = if is_xml_snippet(text) {
        Notation::Xml
    } else if is_java_snippet(text, filters.for_notation(Notation::Java)) {
        Notation::Java
    } else {
        Notation::Other
    };

    let snippet = CodeSnippet { language, snippet_text: text.to_string() };
    match sink.store_snippet(&snippet) {
        Ok(_) => Some(snippet),
        Err(e) => {
            tracing::error!(error = %e, "error while classifying snippet");
            None
        },
    }
}

// ── XML ───────────────────────────────────────────────────────────────

/// Any opening, closing, or self-closing tag.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static XML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z_][\w:.-]*(?:\s[^<>]*)?/?>").expect("valid regex"));

/// Starts with an XML declaration, or contains a tag and is mostly markup lines.
pub fn is_xml_snippet(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.starts_with("<?xml") {
        return true;
    }
    XML_TAG_RE.is_match(trimmed) && is_xml_lines(trimmed)
}

/// At least half of the non-blank lines open or close markup.
pub fn is_xml_lines(text: &str) -> bool {
    mostly(text, |line| {
        let line = line.trim();
        line.starts_with('<') || line.ends_with('>')
    })
}

// ── Java ──────────────────────────────────────────────────────────────

/// Keywords that start a Java declaration or statement.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static JAVA_KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:public|private|protected|static|final|abstract|import|package|class|interface|enum|return|if|else|for|while|try|catch|finally|new|throw)\b",
    )
    .expect("valid regex")
});

/// No filter rejects the text and it is mostly Java-like lines.
pub fn is_java_snippet(text: &str, filters: &[Box<dyn SnippetFilter>]) -> bool {
    if let Some(filter) = filters.iter().find(|f| f.suppresses(text)) {
        tracing::trace!(filter = filter.name(), "java shape suppressed");
        return false;
    }
    is_java_lines(text, filters)
}

/// At least half of the non-blank lines look like Java statements,
/// declarations, annotations, or comments.
pub fn is_java_lines(text: &str, filters: &[Box<dyn SnippetFilter>]) -> bool {
    mostly(text, |line| is_java_line(line, filters))
}

/// One trimmed line reads like Java and no filter rejects it.
fn is_java_line(line: &str, filters: &[Box<dyn SnippetFilter>]) -> bool {
    let line = line.trim();
    if filters.iter().any(|f| f.suppresses(line)) {
        return false;
    }
    line.ends_with([';', '{', '}'])
        || line.starts_with('@')
        || line.starts_with("//")
        || line.starts_with("/*")
        || line.starts_with('*')
        || JAVA_KEYWORD_RE.is_match(line)
}

// ── Mail paragraphs ───────────────────────────────────────────────────

/// `On <date>, <someone> wrote:`
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static REPLY_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^On\b.*\bwrote:$").expect("valid regex"));

/// Frame, header, cause, or elision line of a stack trace.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static TRACE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:at\s+[\w$.<>]+\(.*\)|Exception in thread\b.*|Caused by:.*|[\w$.]+(?:Exception|Error)(?::.*)?|\.\.\. \d+ more)$",
    )
    .expect("valid regex")
});

/// Timestamped or level-prefixed log line.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static LOG_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:\d{4}-\d{2}-\d{2}[ T])?\d{2}:\d{2}:\d{2}[,.\d]*\s.*\b(?:TRACE|DEBUG|INFO|WARN|WARNING|ERROR|FATAL)\b|\[?(?:TRACE|DEBUG|INFO|WARN|WARNING|ERROR|FATAL)\]?\s)",
    )
    .expect("valid regex")
});

/// Nothing but whitespace.
pub fn is_empty_lines(text: &str) -> bool {
    text.lines().all(|l| l.trim().is_empty())
}

/// Every non-blank line is quoted with `>`.
pub fn is_reply_lines(text: &str) -> bool {
    let lines = non_blank_lines(text);
    !lines.is_empty() && lines.iter().all(|l| l.trim_start().starts_with('>'))
}

/// `On Mon, 3 May 2010, Bob wrote:`
pub fn is_reply_header(text: &str) -> bool {
    REPLY_HEADER_RE.is_match(text.trim())
}

/// Forwarded-message banners and signature delimiters; everything after
/// them is someone else's text.
pub fn is_rest_reply(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with("-----Original Message-----")
        || trimmed.starts_with("________________________________")
        || trimmed.lines().next().is_some_and(|l| l.trim_end() == "--")
}

/// At least half of the non-blank lines belong to a stack trace.
pub fn is_exception_trace_lines(text: &str) -> bool {
    mostly(text, |line| TRACE_LINE_RE.is_match(line.trim()))
}

/// At least half of the non-blank lines are log lines.
pub fn is_log_lines(text: &str) -> bool {
    mostly(text, |line| LOG_LINE_RE.is_match(line.trim_start()))
}

/// Paragraph test shared across threads.
type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Ordered paragraph predicates; the first that matches decides.
pub struct ParagraphClassifiers {
    /// Predicates in evaluation order, each with the notation it assigns.
    classifiers: Vec<(Predicate, Notation)>,
}

impl ParagraphClassifiers {
    /// No classifiers; every paragraph is unclassified.
    pub fn empty() -> Self {
        Self { classifiers: Vec::new() }
    }

    /// Append `predicate`, tried after every earlier one.
    #[must_use]
    pub fn with(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static, notation: Notation) -> Self {
        self.classifiers.push((Box::new(predicate), notation));
        self
    }

    /// Notation of the first matching predicate, if any.
    pub fn classify_paragraph(&self, paragraph: &str) -> Option<Notation> {
        self.classifiers
            .iter()
            .find(|(predicate, _)| predicate(paragraph))
            .map(|(_, notation)| *notation)
    }
}

impl Default for ParagraphClassifiers {
    fn default() -> Self {
        let filters = Filters::default();
        Self::empty()
            .with(is_empty_lines, Notation::Reply)
            .with(is_reply_lines, Notation::Reply)
            .with(is_reply_header, Notation::Reply)
            .with(is_rest_reply, Notation::Stop)
            .with(
                move |text: &str| is_java_lines(text, filters.for_notation(Notation::Java)),
                Notation::Java,
            )
            .with(is_exception_trace_lines, Notation::ExceptionTrace)
            .with(is_log_lines, Notation::Log)
            .with(is_xml_lines, Notation::Xml)
    }
}

/// Lines with at least one non-whitespace character.
fn non_blank_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.trim().is_empty()).collect()
}

/// At least half of the non-blank lines satisfy `predicate`.
fn mostly(text: &str, predicate: impl Fn(&str) -> bool) -> bool {
    let lines = non_blank_lines(text);
    if lines.is_empty() {
        return false;
    }
    let hits = lines.iter().filter(|l| predicate(l)).count();
    hits.saturating_mul(2) >= lines.len()
}
