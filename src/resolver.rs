//! Reduces pooled candidate matches to a consistent reference tree.
//!
//! Candidates are walked in start order. A candidate survives when it does
//! not overlap anything already accepted and no later candidate it overlaps
//! outranks it. Survivors become references, their children attach to the
//! nearest accepted reference of the hierarchy's parent kind, and contents
//! already recorded in the exclusion list are skipped.

use crate::context::{find_paragraph, find_sentence};
use crate::error::Error;
use crate::exclusion::ExclusionList;
use crate::hierarchy::KindHierarchy;
use crate::sink::Sink;
use crate::types::{Kind, RawMatch, Reference, Span};

/// Per-call switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Number top-level references in creation order.
    pub save_index: bool,
    /// Attach the enclosing sentence and paragraph to each reference.
    pub find_context: bool,
    /// Never fall back to a whole-text reference.
    pub strict: bool,
}

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// References in creation order. `parent_reference` indexes into this list.
    pub references: Vec<Reference>,
    /// Candidates rejected because they lost a conflict.
    pub filtered: Vec<RawMatch>,
    /// Whether any accepted candidate was claimed without producing a
    /// reference (an `ignore` match or an exclusion-list hit).
    pub avoided: bool,
}

/// One resolution pass configuration: the kind hierarchy plus options.
pub struct Resolver<'a> {
    /// Parent kinds used to link children.
    hierarchy: &'a KindHierarchy,
    /// Per-call switches.
    options: ResolveOptions,
}

impl<'a> Resolver<'a> {
    /// Resolver over `hierarchy` with `options`.
    pub const fn new(hierarchy: &'a KindHierarchy, options: ResolveOptions) -> Self {
        Self { hierarchy, options }
    }

    /// Resolve `matches` found in `text` into references, storing each one in
    /// `sink` as soon as it is created.
    ///
    /// `context` is the structural kind the text came from; it becomes the
    /// kind of the whole-text fallback reference.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSpan` before storing anything if any span does
    /// not slice `text` cleanly, or the first error returned by `sink`.
    pub fn resolve(
        &self,
        text: &str,
        context: Kind,
        mut matches: Vec<RawMatch>,
        exclusions: &mut ExclusionList,
        sink: &mut dyn Sink,
    ) -> Result<Resolution, Error> {
        validate_spans(text, &matches)?;

        // Stable: equal starts keep strategy order.
        matches.sort_by_key(|m| m.parent.start);

        let mut resolution = Resolution::default();
        let mut accepted: Vec<usize> = Vec::new();
        let mut index: usize = 0;

        for (position, candidate) in matches.iter().enumerate() {
            if !is_valid_match(position, &matches, &accepted) {
                resolution.filtered.push(candidate.clone());
                continue;
            }
            accepted.push(position);

            if candidate.parent.kind == Kind::Ignore {
                resolution.avoided = true;
                continue;
            }

            let content = span_text(text, &candidate.parent)?;
            if exclusions.consume(content) {
                tracing::trace!(content, "skipping known reference");
                resolution.avoided = true;
                continue;
            }

            let parent = self.reference(text, &candidate.parent, index)?;
            store(parent, &mut resolution.references, sink)?;

            for (child_index, child) in candidate.children.iter().enumerate() {
                let mut reference = self.reference(text, child, index)?;
                reference.child_index = Some(child_index);
                reference.parent_reference =
                    self.hierarchy.find_parent_reference(child.kind, &resolution.references);
                store(reference, &mut resolution.references, sink)?;
            }

            index = index.saturating_add(1);
        }

        if resolution.references.is_empty() && !resolution.avoided && !self.options.strict {
            let fallback = Reference::new(text, context, 0..text.len());
            store(fallback, &mut resolution.references, sink)?;
        }

        tracing::debug!(
            references = resolution.references.len(),
            filtered = resolution.filtered.len(),
            avoided = resolution.avoided,
            "resolved matches"
        );

        Ok(resolution)
    }

    /// Reference for `span`, with index and context as the options ask.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSpan` if `span` does not slice `text`.
    fn reference(&self, text: &str, span: &Span, index: usize) -> Result<Reference, Error> {
        let mut reference = Reference::new(span_text(text, span)?, span.kind, span.range());
        if self.options.save_index {
            reference.index = Some(index);
        }
        if self.options.find_context {
            reference.sentence = Some(find_sentence(text, span.range()).to_string());
            reference.paragraph = Some(find_paragraph(text, span.range()).to_string());
        }
        Ok(reference)
    }
}

/// Hand `reference` to the sink, then make it visible to later parent lookups.
///
/// # Errors
///
/// Returns the sink's error unchanged.
fn store(reference: Reference, accepted: &mut Vec<Reference>, sink: &mut dyn Sink) -> Result<(), Error> {
    sink.store_reference(&reference)?;
    accepted.push(reference);
    Ok(())
}

/// A candidate is valid when it overlaps no accepted match and no later,
/// not-yet-processed candidate outranks it on an overlapping range.
/// `matches` must be sorted by start.
fn is_valid_match(position: usize, matches: &[RawMatch], accepted: &[usize]) -> bool {
    let Some(candidate) = matches.get(position) else {
        return false;
    };
    let span = &candidate.parent;

    if accepted
        .iter()
        .filter_map(|&a| matches.get(a))
        .any(|a| a.parent.overlaps(span))
    {
        return false;
    }

    for (other_position, other) in matches.iter().enumerate().skip(position.saturating_add(1)) {
        // Sorted by start: nothing further can overlap.
        if other.parent.start >= span.end {
            break;
        }
        if other.parent.overlaps(span) && outranks(&other.parent, other_position, span, position) {
            return false;
        }
    }

    true
}

/// Precedence: lower priority number, then leftmost start, then list order.
fn outranks(a: &Span, a_position: usize, b: &Span, b_position: usize) -> bool {
    (a.priority, a.start, a_position) < (b.priority, b.start, b_position)
}

/// Every parent and child span must slice `text` on character boundaries.
///
/// # Errors
///
/// Returns `Error::InvalidSpan` for the first offending span.
fn validate_spans(text: &str, matches: &[RawMatch]) -> Result<(), Error> {
    let spans = matches
        .iter()
        .flat_map(|m| std::iter::once(&m.parent).chain(m.children.iter()));
    for span in spans {
        span_text(text, span)?;
    }
    Ok(())
}

/// The text `span` covers. Reversed, out-of-bounds, and non-char-boundary
/// spans do not slice.
///
/// # Errors
///
/// Returns `Error::InvalidSpan` when `span` does not slice `text`.
fn span_text<'t>(text: &'t str, span: &Span) -> Result<&'t str, Error> {
    text.get(span.range()).ok_or(Error::InvalidSpan {
        start: span.start,
        end: span.end,
        len: text.len(),
    })
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "tests index known output")]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn span(text: &str, needle: &str, kind: Kind, priority: u8) -> Span {
        let start = text.find(needle).unwrap();
        Span::new(start, start + needle.len(), kind, priority)
    }

    fn run(
        text: &str,
        matches: Vec<RawMatch>,
        options: ResolveOptions,
        exclusions: &mut ExclusionList,
    ) -> Resolution {
        let hierarchy = KindHierarchy::default();
        let mut sink = MemorySink::new();
        let resolution = Resolver::new(&hierarchy, options)
            .resolve(text, Kind::Unknown, matches, exclusions, &mut sink)
            .unwrap();
        assert_eq!(sink.references, resolution.references);
        resolution
    }

    #[test]
    fn field_child_attaches_to_class_parent() {
        let text = "class Foo { int bar; }";
        let m = RawMatch::with_children(
            span(text, "Foo", Kind::Class, 1),
            vec![span(text, "bar", Kind::Field, 1)],
        );
        let r = run(text, vec![m], ResolveOptions::default(), &mut ExclusionList::new());
        assert_eq!(r.references.len(), 2);
        assert_eq!(r.references[0].content, "Foo");
        assert_eq!(r.references[1].content, "bar");
        assert_eq!(r.references[1].parent_reference, Some(0));
        assert_eq!(r.references[1].child_index, Some(0));
        assert_eq!(r.references[0].child_index, None);
    }

    #[test]
    fn lower_priority_number_wins_at_same_start() {
        let text = "Session.save()";
        let weak = RawMatch::single(span(text, "Session", Kind::Class, 3));
        let strong = RawMatch::single(span(text, "Session.save()", Kind::Method, 1));
        let r = run(text, vec![weak.clone(), strong], ResolveOptions::default(), &mut ExclusionList::new());
        assert_eq!(r.references.len(), 1);
        assert_eq!(r.references[0].kind_hint, Kind::Method);
        assert_eq!(r.filtered, [weak]);
    }

    #[test]
    fn leftmost_wins_at_equal_priority() {
        let text = "abcdef";
        let left = RawMatch::single(Span::new(0, 4, Kind::Class, 2));
        let right = RawMatch::single(Span::new(2, 6, Kind::Field, 2));
        let r = run(text, vec![right.clone(), left], ResolveOptions::default(), &mut ExclusionList::new());
        assert_eq!(r.references.len(), 1);
        assert_eq!(r.references[0].content, "abcd");
        assert_eq!(r.filtered, [right]);
    }

    #[test]
    fn later_stronger_match_rejects_earlier_weaker_one() {
        let text = "abcdef";
        let early = RawMatch::single(Span::new(0, 4, Kind::Class, 3));
        let late = RawMatch::single(Span::new(2, 6, Kind::Ignore, 0));
        let r = run(text, vec![early.clone(), late], ResolveOptions::default(), &mut ExclusionList::new());
        assert!(r.references.is_empty());
        assert!(r.avoided);
        assert_eq!(r.filtered, [early]);
    }

    #[test]
    fn excluded_content_is_consumed_once() {
        let text = "Foo and Foo";
        let matches = vec![
            RawMatch::single(Span::new(0, 3, Kind::Class, 1)),
            RawMatch::single(Span::new(8, 11, Kind::Class, 1)),
        ];
        let mut exclusions: ExclusionList = ["Foo"].into_iter().collect();
        let r = run(text, matches, ResolveOptions::default(), &mut exclusions);
        assert_eq!(r.references.len(), 1);
        assert_eq!(r.references[0].span, 8..11);
        assert!(exclusions.is_empty());
    }

    #[test]
    fn exclusion_skip_does_not_advance_index() {
        let text = "Foo Bar Baz";
        let matches = vec![
            RawMatch::single(Span::new(0, 3, Kind::Class, 1)),
            RawMatch::single(Span::new(4, 7, Kind::Class, 1)),
            RawMatch::single(Span::new(8, 11, Kind::Class, 1)),
        ];
        let options = ResolveOptions { save_index: true, ..ResolveOptions::default() };
        let mut exclusions: ExclusionList = ["Bar"].into_iter().collect();
        let r = run(text, matches, options, &mut exclusions);
        let indices: Vec<Option<usize>> = r.references.iter().map(|r| r.index).collect();
        assert_eq!(indices, [Some(0), Some(1)]);
    }

    #[test]
    fn children_carry_parent_match_index() {
        let text = "<a x=\"1\"> <b y=\"2\">";
        let first = RawMatch::with_children(
            Span::new(0, 9, Kind::XmlElement, 1),
            vec![Span::new(3, 4, Kind::XmlAttribute, 1), Span::new(6, 7, Kind::XmlAttributeValue, 1)],
        );
        let second = RawMatch::with_children(
            Span::new(10, 19, Kind::XmlElement, 1),
            vec![Span::new(13, 14, Kind::XmlAttribute, 1)],
        );
        let options = ResolveOptions { save_index: true, ..ResolveOptions::default() };
        let r = run(text, vec![second, first], options, &mut ExclusionList::new());
        let summary: Vec<(&str, Option<usize>, Option<usize>)> = r
            .references
            .iter()
            .map(|r| (r.content.as_str(), r.index, r.parent_reference))
            .collect();
        assert_eq!(
            summary,
            [
                ("<a x=\"1\">", Some(0), None),
                ("x", Some(0), Some(0)),
                ("1", Some(0), Some(1)),
                ("<b y=\"2\">", Some(1), None),
                ("y", Some(1), Some(3)),
            ]
        );
    }

    #[test]
    fn fallback_covers_whole_text_with_context_kind() {
        let text = "nothing code-like here";
        let hierarchy = KindHierarchy::default();
        let mut sink = MemorySink::new();
        let r = Resolver::new(&hierarchy, ResolveOptions::default())
            .resolve(text, Kind::Method, Vec::new(), &mut ExclusionList::new(), &mut sink)
            .unwrap();
        assert_eq!(r.references.len(), 1);
        assert_eq!(r.references[0].content, text);
        assert_eq!(r.references[0].kind_hint, Kind::Method);
    }

    #[test]
    fn strict_mode_never_falls_back() {
        let r = run(
            "plain prose",
            Vec::new(),
            ResolveOptions { strict: true, ..ResolveOptions::default() },
            &mut ExclusionList::new(),
        );
        assert!(r.references.is_empty());
    }

    #[test]
    fn ignore_match_suppresses_fallback() {
        let text = "mail dev@example.org";
        let m = RawMatch::single(span(text, "dev@example.org", Kind::Ignore, 0));
        let r = run(text, vec![m], ResolveOptions::default(), &mut ExclusionList::new());
        assert!(r.references.is_empty());
        assert!(r.avoided);
    }

    #[test]
    fn context_is_attached_when_requested() {
        let text = "First. Call Foo now.\n\nOther.";
        let m = RawMatch::single(span(text, "Foo", Kind::Class, 1));
        let options = ResolveOptions { find_context: true, ..ResolveOptions::default() };
        let r = run(text, vec![m], options, &mut ExclusionList::new());
        assert_eq!(r.references[0].sentence.as_deref(), Some("Call Foo now."));
        assert_eq!(r.references[0].paragraph.as_deref(), Some("First. Call Foo now."));
    }

    #[test]
    fn out_of_bounds_span_is_rejected_before_storing() {
        let hierarchy = KindHierarchy::default();
        let mut sink = MemorySink::new();
        let matches = vec![
            RawMatch::single(Span::new(0, 2, Kind::Class, 1)),
            RawMatch::single(Span::new(3, 40, Kind::Class, 1)),
        ];
        let err = Resolver::new(&hierarchy, ResolveOptions::default())
            .resolve("short", Kind::Unknown, matches, &mut ExclusionList::new(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpan { start: 3, end: 40, len: 5 }));
        assert!(sink.references.is_empty());
    }

    #[test]
    fn span_inside_multibyte_char_is_rejected() {
        let hierarchy = KindHierarchy::default();
        let mut sink = MemorySink::new();
        let matches = vec![RawMatch::single(Span::new(0, 1, Kind::Class, 1))];
        let err = Resolver::new(&hierarchy, ResolveOptions::default())
            .resolve("é", Kind::Unknown, matches, &mut ExclusionList::new(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpan { .. }));
    }

    #[test]
    fn reversed_span_is_rejected() {
        let hierarchy = KindHierarchy::default();
        let mut sink = MemorySink::new();
        let matches = vec![RawMatch::single(Span::new(4, 2, Kind::Class, 1))];
        let err = Resolver::new(&hierarchy, ResolveOptions::default())
            .resolve("abcdef", Kind::Unknown, matches, &mut ExclusionList::new(), &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSpan { start: 4, end: 2, len: 6 }));
    }
}
