//! Matchers for Java-like identifiers: calls, members, annotations, types.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::{
    ANNOTATION_PRIORITY, CLASS_METHOD_PRIORITY, FIELD_PRIORITY, METHOD_PRIORITY, OTHER_PRIORITY,
    Strategy, byte_before, is_word_byte,
};
use crate::types::{Kind, RawMatch, Span};

/// `Type.method(args)` or `Type#method(args)`, type optionally package-qualified.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static CLASS_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[a-z_][\w$]*\.)*[A-Z][\w$]*)[.#]([A-Za-z_][\w$]*)\(([^()\n]*)\)")
        .expect("valid regex")
});

/// `method(args)` with the parenthesis glued to the name.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static METHOD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([a-z_][\w$]*)\(([^()\n]*)\)").expect("valid regex"));

/// One declared parameter: `Type name`, `final Type<T>[] name`, `Type... name`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static PARAM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:final\s+)?[A-Za-z_][\w$.]*(?:<[^<>]*>)?(?:\[\])*(?:\.\.\.)?\s+([A-Za-z_][\w$]*)\s*$")
        .expect("valid regex")
});

/// `Type.member`, type optionally package-qualified.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b((?:[a-z_][\w$]*\.)*[A-Z][\w$]*)[.#]([A-Za-z_][\w$]*)").expect("valid regex")
});

/// `MAX_SIZE`-style constants. The underscore keeps plain acronyms out.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static CONSTANT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)+\b").expect("valid regex"));

/// `@Name`, optionally nested as `@Outer.Inner`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Z][\w$]*(?:\.[A-Z][\w$]*)*)").expect("valid regex"));

/// Package-qualified type name: `org.hibernate.Session`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static FQN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:[a-z_][\w$]*\.)+[A-Z][\w$]*").expect("valid regex"));

/// At least two humps: `HashMap`, `SessionFactory`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static CAMEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z0-9]+[A-Z][\w$]*").expect("valid regex"));

/// `getName`, `sessionFactory`.
#[allow(clippy::expect_used, reason = "pattern is a literal")]
static LOWER_CAMEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]+[A-Z][\w$]*").expect("valid regex"));

/// Qualified method calls. The match covers the whole call; children are the
/// type, the method name, and any declared parameter names.
pub struct ClassMethodStrategy;

impl Strategy for ClassMethodStrategy {
    fn name(&self) -> &'static str {
        "class-method"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        CLASS_METHOD_RE
            .captures_iter(text)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                let class = cap.get(1)?;
                let method = cap.get(2)?;
                let mut children = vec![
                    Span::new(class.start(), class.end(), Kind::Class, CLASS_METHOD_PRIORITY),
                    Span::new(method.start(), method.end(), Kind::Method, CLASS_METHOD_PRIORITY),
                ];
                children.extend(parameter_spans(&cap, 3, CLASS_METHOD_PRIORITY));
                Some(RawMatch::with_children(
                    Span::new(whole.start(), whole.end(), Kind::Method, CLASS_METHOD_PRIORITY),
                    children,
                ))
            })
            .collect()
    }
}

/// Unqualified calls such as `openSession()`.
pub struct MethodStrategy;

impl Strategy for MethodStrategy {
    fn name(&self) -> &'static str {
        "method"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        METHOD_RE
            .captures_iter(text)
            .filter_map(|cap| {
                let whole = cap.get(0)?;
                Some(RawMatch::with_children(
                    Span::new(whole.start(), whole.end(), Kind::Method, METHOD_PRIORITY),
                    parameter_spans(&cap, 2, METHOD_PRIORITY),
                ))
            })
            .collect()
    }
}

/// Names of declared parameters inside the argument list captured at `group`.
/// Arguments that are plain expressions (`foo(a, 3)`) yield nothing.
fn parameter_spans(cap: &Captures<'_>, group: usize, priority: u8) -> Vec<Span> {
    let Some(args) = cap.get(group) else {
        return Vec::new();
    };
    let mut spans = Vec::new();
    let mut offset = args.start();
    for part in args.as_str().split(',') {
        if let Some(name) = PARAM_RE.captures(part).and_then(|c| c.get(1)) {
            spans.push(Span::new(
                offset.saturating_add(name.start()),
                offset.saturating_add(name.end()),
                Kind::MethodParameter,
                priority,
            ));
        }
        // Skip the part and its comma.
        offset = offset.saturating_add(part.len()).saturating_add(1);
    }
    spans
}

/// Qualified member access not followed by a call, plus bare constants.
pub struct FieldStrategy;

impl Strategy for FieldStrategy {
    fn name(&self) -> &'static str {
        "field"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();

        for cap in FIELD_RE.captures_iter(text) {
            let (Some(whole), Some(class), Some(field)) = (cap.get(0), cap.get(1), cap.get(2)) else {
                continue;
            };
            // Calls belong to the method strategies.
            if text.get(whole.end()..).is_some_and(|rest| rest.trim_start().starts_with('(')) {
                continue;
            }
            matches.push(RawMatch::with_children(
                Span::new(whole.start(), whole.end(), Kind::Field, FIELD_PRIORITY),
                vec![
                    Span::new(class.start(), class.end(), Kind::Class, FIELD_PRIORITY),
                    Span::new(field.start(), field.end(), Kind::Field, FIELD_PRIORITY),
                ],
            ));
        }

        for m in CONSTANT_RE.find_iter(text) {
            matches.push(RawMatch::single(Span::new(m.start(), m.end(), Kind::Field, FIELD_PRIORITY)));
        }

        matches
    }
}

/// `@Entity`, `@Column`. The span covers the name without the `@`.
pub struct AnnotationStrategy;

impl Strategy for AnnotationStrategy {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        ANNOTATION_RE
            .captures_iter(text)
            .filter_map(|cap| {
                let at = cap.get(0)?;
                // `user@Example.com` is an address, not an annotation.
                if byte_before(text, at.start()).is_some_and(|b| is_word_byte(b) || b == b'.') {
                    return None;
                }
                let name = cap.get(1)?;
                Some(RawMatch::single(Span::new(
                    name.start(),
                    name.end(),
                    Kind::Annotation,
                    ANNOTATION_PRIORITY,
                )))
            })
            .collect()
    }
}

/// Type names and camel-case identifiers that carry no other structure.
pub struct OtherStrategy;

impl Strategy for OtherStrategy {
    fn name(&self) -> &'static str {
        "other"
    }

    fn find_matches(&self, text: &str) -> Vec<RawMatch> {
        let types = FQN_RE
            .find_iter(text)
            .chain(CAMEL_RE.find_iter(text))
            .map(|m| RawMatch::single(Span::new(m.start(), m.end(), Kind::Class, OTHER_PRIORITY)));
        let identifiers = LOWER_CAMEL_RE
            .find_iter(text)
            .map(|m| RawMatch::single(Span::new(m.start(), m.end(), Kind::Unknown, OTHER_PRIORITY)));
        types.chain(identifiers).collect()
    }
}
