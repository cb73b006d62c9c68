//! File-name matcher and the noise matcher that claims addresses and URLs.

use std::sync::LazyLock;

use regex::Regex;

use super::{FILE_PRIORITY, IGNORE_PRIORITY, Strategy};
use crate::types::{Kind, RawMatch, Span};

/// A file name with an optional relative or absolute directory prefix.
/// `hbm.xml` is listed first so mapping files are not reported as plain XML.
/// The extension must end the name: a following `.word` means it was a
/// package segment (`javax.xml.parsers`), so the match lies outside group 1.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"/?(?:[\w-]+/)*[\w-]+(?:\.[\w-]+)*?\.((?i:hbm\.xml|xml|ini|conf|properties|log|jar|java|py))(?:[^\w.]|\.(?:\W|$)|$)",
    )
    .expect("valid regex")
});

/// E-mail addresses.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.+-]+@[\w-]+(?:\.[\w-]+)+").expect("valid regex"));

/// Absolute URLs and bare `www.` hosts.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
pub static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:(?:https?|ftp)://|www\.)[^\s<>"'()\[\]]+"#).expect("valid regex")
});

/// Configuration, source, and archive files mentioned by name.
pub struct FileStrategy;

impl Strategy for FileStrategy {
    fn name(&self) -> &'static str {
        "file"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        FILE_RE
            .captures_iter(text)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let extension = cap.get(1)?;
                let kind = file_kind(extension.as_str())?;
                Some(RawMatch::single(Span::new(whole.start(), extension.end(), kind, FILE_PRIORITY)))
            })
            .collect()
    }
}

/// Kind for a lower- or mixed-case extension.
fn file_kind(extension: &str) -> Option<Kind> {
    match extension.to_ascii_lowercase().as_str() {
        "hbm.xml" => Some(Kind::HbmFile),
        "xml" => Some(Kind::XmlFile),
        "ini" => Some(Kind::IniFile),
        "conf" => Some(Kind::ConfFile),
        "properties" => Some(Kind::PropertiesFile),
        "log" => Some(Kind::LogFile),
        "jar" => Some(Kind::JarFile),
        "java" => Some(Kind::JavaFile),
        "py" => Some(Kind::PythonFile),
        _ => None,
    }
}

/// Claims text that looks code-like but is not, such as `john.doe@Example.org`
/// or `http://host/Foo.java`. Its matches use the `ignore` kind so the
/// resolver knows the text was handled without creating references.
#[derive(Clone)]
pub struct IgnoreStrategy {
    /// Patterns whose matches are claimed as noise.
    patterns: Vec<Regex>,
}

impl IgnoreStrategy {
    /// Strategy claiming matches of `patterns`.
    pub const fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }
}

impl Default for IgnoreStrategy {
    fn default() -> Self {
        Self::new(vec![EMAIL_RE.clone(), URL_RE.clone()])
    }
}

impl Strategy for IgnoreStrategy {
    fn name(&self) -> &'static str {
        "ignore"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for pattern in &self.patterns {
            for m in pattern.find_iter(text) {
                // Sentence punctuation after a URL is not part of it.
                let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
                if trimmed.is_empty() {
                    continue;
                }
                let end = m.start().saturating_add(trimmed.len());
                matches.push(RawMatch::single(Span::new(m.start(), end, Kind::Ignore, IGNORE_PRIORITY)));
            }
        }
        matches
    }
}
