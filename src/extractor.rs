//! End-to-end extraction: strategies, dictionary augmentation, resolution.

use crate::codewords::{CodeWords, augment};
use crate::error::Error;
use crate::exclusion::ExclusionList;
use crate::hierarchy::KindHierarchy;
use crate::resolver::{Resolution, ResolveOptions, Resolver};
use crate::sink::Sink;
use crate::strategy::StrategyTable;
use crate::types::Kind;

/// Immutable extraction pipeline, shareable across threads.
#[derive(Default)]
pub struct Extractor {
    /// Strategies run per context kind.
    strategies: StrategyTable,
    /// Parent kinds used to link children.
    hierarchy: KindHierarchy,
    /// Resolver options for every pass.
    options: ResolveOptions,
}

impl Extractor {
    /// Pipeline over the given strategies, hierarchy, and options.
    pub const fn new(strategies: StrategyTable, hierarchy: KindHierarchy, options: ResolveOptions) -> Self {
        Self { strategies, hierarchy, options }
    }

    /// Replace the resolver options.
    #[must_use]
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Extract references from `text`, which came from a `context` element.
    ///
    /// Each reference is stored in `sink` as soon as it is created. When
    /// `exclusions` is given, contents found there are skipped and consumed.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidSpan` if a strategy reported a span that does
    /// not slice `text`, or the first error returned by `sink`.
    pub fn extract(
        &self,
        text: &str,
        context: Kind,
        code_words: Option<&CodeWords>,
        exclusions: Option<&mut ExclusionList>,
        sink: &mut dyn Sink,
    ) -> Result<Resolution, Error> {
        let mut matches = self.strategies.find_matches(context, text);
        if let Some(words) = code_words {
            matches.extend(augment(text, words));
        }
        tracing::debug!(%context, candidates = matches.len(), "pooled candidate matches");

        let mut scratch = ExclusionList::new();
        let exclusions = exclusions.unwrap_or(&mut scratch);
        Resolver::new(&self.hierarchy, self.options).resolve(text, context, matches, exclusions, sink)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, reason = "tests index known output")]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn extract(text: &str, context: Kind, code_words: Option<&CodeWords>) -> Resolution {
        let mut sink = MemorySink::new();
        Extractor::default()
            .extract(text, context, code_words, None, &mut sink)
            .unwrap()
    }

    fn summary(resolution: &Resolution) -> Vec<(&str, Kind)> {
        resolution
            .references
            .iter()
            .map(|r| (r.content.as_str(), r.kind_hint))
            .collect()
    }

    #[test]
    fn class_method_call_yields_tree() {
        let r = extract("Call Session.save(Object entity) first.", Kind::Unknown, None);
        assert_eq!(
            summary(&r),
            [
                ("Session.save(Object entity)", Kind::Method),
                ("Session", Kind::Class),
                ("save", Kind::Method),
                ("entity", Kind::MethodParameter),
            ]
        );
        assert_eq!(r.references[2].parent_reference, Some(1));
        assert_eq!(r.references[3].parent_reference, Some(2));
    }

    #[test]
    fn dictionary_never_overrides_structure() {
        let words: CodeWords = ["sessionfactory"].into_iter().collect();
        let r = extract("Then call sessionFactory() again.", Kind::Unknown, Some(&words));
        assert_eq!(summary(&r), [("sessionFactory()", Kind::Method)]);
    }

    #[test]
    fn dictionary_loses_ties_on_identical_spans() {
        // Both the dictionary and a structural strategy cover exactly `Entity`.
        let words: CodeWords = ["entity"].into_iter().collect();
        let r = extract("Mark it @Entity here.", Kind::Unknown, Some(&words));
        assert_eq!(summary(&r), [("Entity", Kind::Annotation)]);

        let words: CodeWords = ["max_size"].into_iter().collect();
        let r = extract("Raise MAX_SIZE first.", Kind::Unknown, Some(&words));
        assert_eq!(summary(&r), [("MAX_SIZE", Kind::Field)]);
    }

    #[test]
    fn children_share_the_sentence_of_their_parent() {
        let mut sink = MemorySink::new();
        let options = ResolveOptions { find_context: true, ..ResolveOptions::default() };
        let r = Extractor::default()
            .with_options(options)
            .extract("First one. Then call Session.save(cat) now.", Kind::Unknown, None, None, &mut sink)
            .unwrap();
        assert_eq!(summary(&r)[2], ("save", Kind::Method));
        for reference in &r.references {
            assert_eq!(reference.sentence.as_deref(), Some("Then call Session.save(cat) now."));
        }
    }

    #[test]
    fn dictionary_finds_what_structure_misses() {
        let words: CodeWords = ["hbm"].into_iter().collect();
        let r = extract("Edit the hbm mapping.", Kind::Unknown, Some(&words));
        assert_eq!(summary(&r), [("hbm", Kind::Class)]);
    }

    #[test]
    fn qualified_type_names_are_not_files() {
        let r = extract("Use javax.xml.parsers.DocumentBuilder or com.acme.conf.Settings here.", Kind::Unknown, None);
        assert_eq!(
            summary(&r),
            [("javax.xml.parsers.DocumentBuilder", Kind::Class), ("com.acme.conf.Settings", Kind::Class)]
        );
    }

    #[test]
    fn noise_suppresses_fallback() {
        let r = extract("Write to dev@example.org", Kind::Unknown, None);
        assert!(r.references.is_empty());
        assert!(r.avoided);
    }

    #[test]
    fn method_context_restricts_strategies() {
        // `@Entity` only matches in the default set.
        let r = extract("@Entity", Kind::Method, None);
        assert_eq!(summary(&r), [("@Entity", Kind::Method)]);
        let r = extract("@Entity", Kind::Unknown, None);
        assert_eq!(summary(&r), [("Entity", Kind::Annotation)]);
    }

    #[test]
    fn exclusions_are_consumed_through_the_pipeline() {
        let mut exclusions: ExclusionList = ["SessionFactory"].into_iter().collect();
        let mut sink = MemorySink::new();
        let r = Extractor::default()
            .extract("SessionFactory or SessionFactory", Kind::Unknown, None, Some(&mut exclusions), &mut sink)
            .unwrap();
        assert_eq!(summary(&r), [("SessionFactory", Kind::Class)]);
        assert_eq!(r.references[0].span, 18..32);
        assert!(exclusions.is_empty());
    }
}
