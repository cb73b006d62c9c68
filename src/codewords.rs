//! Code-word dictionary and the augmenter that turns bare words into
//! low-priority candidates.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::strategy::LOWEST_STRUCTURAL_PRIORITY;
use crate::types::{Kind, RawMatch, Span};

/// Dictionary hits lose to every structural strategy.
pub const DICTIONARY_PRIORITY: u8 = LOWEST_STRUCTURAL_PRIORITY.saturating_add(1);

/// Identifier-like word.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w$]+").expect("valid regex"));

/// Lower-cased identifiers that are unlikely to appear in prose by accident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeWords {
    /// Lower-cased members.
    words: HashSet<String>,
}

impl CodeWords {
    /// An empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive code words from the simple names of type-like code elements.
    ///
    /// Compound names (`SessionFactory`) are always kept. Single-token names
    /// are kept only when `is_dictionary_word` says they are not plain
    /// English, so `Session` is dropped but `Hbm` survives.
    pub fn from_type_names<'a, I, F>(names: I, is_dictionary_word: F) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&str) -> bool,
    {
        let mut words = HashSet::new();
        for name in names {
            let lowered = name.to_lowercase();
            if tokenize(name).len() > 1 || !is_dictionary_word(&lowered) {
                words.insert(lowered);
            }
        }
        tracing::debug!(count = words.len(), "computed code words");
        Self { words }
    }

    /// Add `word`, lower-cased.
    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_lowercase());
    }

    /// Case-insensitive membership.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the dictionary has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CodeWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }
}

impl Extend<String> for CodeWords {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.words.extend(iter.into_iter().map(|w| w.to_lowercase()));
    }
}

/// Word tokens of `text` with their byte ranges.
pub fn split_pos(text: &str) -> impl Iterator<Item = (&str, usize, usize)> {
    WORD_RE.find_iter(text).map(|m| (m.as_str(), m.start(), m.end()))
}

/// Camel-case, digit, and underscore tokens of an identifier:
/// `XMLHttpRequest2_id` -> `XML`, `Http`, `Request`, `2`, `id`.
pub fn tokenize(name: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if let Some(s) = start.take() {
                tokens.extend(name.get(s..pos));
            }
            continue;
        }
        let prev = i.checked_sub(1).and_then(|p| chars.get(p)).map(|&(_, p)| p);
        let (Some(s), Some(prev)) = (start, prev) else {
            start = Some(pos);
            continue;
        };
        let next = chars.get(i.saturating_add(1)).map(|&(_, n)| n);
        let boundary = (prev.is_lowercase() && c.is_uppercase())
            || (prev.is_uppercase() && c.is_uppercase() && next.is_some_and(char::is_lowercase))
            || prev.is_ascii_digit() != c.is_ascii_digit();
        if boundary {
            tokens.extend(name.get(s..pos));
            start = Some(pos);
        }
    }

    if let Some(s) = start {
        tokens.extend(name.get(s..));
    }
    tokens
}

/// One childless `class` candidate per word of `text` found in `code_words`.
pub fn augment(text: &str, code_words: &CodeWords) -> Vec<RawMatch> {
    split_pos(text)
        .filter(|(word, _, _)| code_words.contains(word))
        .map(|(_, start, end)| RawMatch::single(Span::new(start, end, Kind::Class, DICTIONARY_PRIORITY)))
        .collect()
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "tests slice known fixtures")]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_camel_case_and_acronyms() {
        assert_eq!(tokenize("SessionFactory"), ["Session", "Factory"]);
        assert_eq!(tokenize("XMLHttpRequest2_id"), ["XML", "Http", "Request", "2", "id"]);
        assert_eq!(tokenize("XMLHttpRequest"), ["XML", "Http", "Request"]);
        assert_eq!(tokenize("max_age2"), ["max", "age", "2"]);
        assert_eq!(tokenize("Session"), ["Session"]);
    }

    #[test]
    fn single_english_words_are_dropped() {
        let english = |w: &str| matches!(w, "session" | "query");
        let words = CodeWords::from_type_names(["Session", "SessionFactory", "Hbm", "Query"], english);
        assert_eq!(words.len(), 2);
        assert!(words.contains("sessionfactory"));
        assert!(words.contains("HBM"));
        assert!(!words.contains("session"));
    }

    #[test]
    fn augment_matches_case_insensitively_at_lowest_priority() {
        let words: CodeWords = ["sessionfactory"].into_iter().collect();
        let text = "Build a SessionFactory, or a sessionFactory.";
        let matches = augment(text, &words);
        assert_eq!(matches.len(), 2);
        for m in &matches {
            assert_eq!(m.parent.kind, Kind::Class);
            assert!(m.parent.priority > LOWEST_STRUCTURAL_PRIORITY);
            assert!(m.children.is_empty());
            assert!(text[m.parent.range()].eq_ignore_ascii_case("sessionfactory"));
        }
    }

    #[test]
    fn augment_with_empty_dictionary_adds_nothing() {
        assert!(augment("anything at all", &CodeWords::new()).is_empty());
    }
}
