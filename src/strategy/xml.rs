//! Matcher for XML tags and their attributes.

use std::sync::LazyLock;

use regex::Regex;

use super::{Strategy, XML_PRIORITY, byte_before, is_word_byte};
use crate::types::{Kind, RawMatch, Span};

/// Opening, closing, or self-closing tag with quoted attributes.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"</?([A-Za-z_][\w:.-]*)((?:\s+[A-Za-z_][\w:.-]*\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*/?>"#,
    )
    .expect("valid regex")
});

/// One `name="value"` or `name='value'` pair.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});

/// XML tags. The match covers the whole tag; each attribute contributes its
/// name and then its value (when non-empty) as children.
pub struct XmlStrategy;

impl Strategy for XmlStrategy {
    fn name(&self) -> &'static str {
        "xml"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for cap in TAG_RE.captures_iter(text) {
            let Some(tag) = cap.get(0) else {
                continue;
            };
            // `List<String>` is a generic type, not markup.
            if byte_before(text, tag.start()).is_some_and(is_word_byte) {
                continue;
            }
            let children = cap
                .get(2)
                .map(|attrs| attribute_spans(attrs.as_str(), attrs.start()))
                .unwrap_or_default();
            matches.push(RawMatch::with_children(
                Span::new(tag.start(), tag.end(), Kind::XmlElement, XML_PRIORITY),
                children,
            ));
        }
        matches
    }
}

/// Name and value spans of the attributes in `attrs`, which starts at byte
/// `offset` of the scanned text.
fn attribute_spans(attrs: &str, offset: usize) -> Vec<Span> {
    let mut spans = Vec::new();
    for cap in ATTRIBUTE_RE.captures_iter(attrs) {
        let Some(name) = cap.get(1) else {
            continue;
        };
        spans.push(Span::new(
            offset.saturating_add(name.start()),
            offset.saturating_add(name.end()),
            Kind::XmlAttribute,
            XML_PRIORITY,
        ));
        if let Some(value) = cap.get(2).or_else(|| cap.get(3)).filter(|v| !v.is_empty()) {
            spans.push(Span::new(
                offset.saturating_add(value.start()),
                offset.saturating_add(value.end()),
                Kind::XmlAttributeValue,
                XML_PRIORITY,
            ));
        }
    }
    spans
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "tests slice known fixtures")]
mod tests {
    use super::*;

    #[test]
    fn tag_children_alternate_attribute_and_value() {
        let text = r#"Declare <property name="dialect" value='org.H2Dialect'/> here."#;
        let matches = XmlStrategy.find_matches(text);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(&text[m.parent.range()], r#"<property name="dialect" value='org.H2Dialect'/>"#);
        let children: Vec<(&str, Kind)> =
            m.children.iter().map(|c| (&text[c.range()], c.kind)).collect();
        assert_eq!(
            children,
            [
                ("name", Kind::XmlAttribute),
                ("dialect", Kind::XmlAttributeValue),
                ("value", Kind::XmlAttribute),
                ("org.H2Dialect", Kind::XmlAttributeValue),
            ]
        );
    }

    #[test]
    fn empty_values_are_skipped() {
        let text = r#"<bean id="">"#;
        let matches = XmlStrategy.find_matches(text);
        assert_eq!(matches[0].children.len(), 1);
    }

    #[test]
    fn generics_are_not_tags() {
        assert!(XmlStrategy.find_matches("a List<String> of names").is_empty());
    }

    #[test]
    fn closing_tags_match_without_children() {
        let matches = XmlStrategy.find_matches("<session-factory></session-factory>");
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.children.is_empty()));
    }
}
