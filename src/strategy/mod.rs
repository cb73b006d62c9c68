//! Pattern matchers that propose candidate references.
//!
//! Each strategy scans the whole text independently and reports every
//! candidate it sees, overlapping or not. Conflicts are settled later by
//! the resolver, never here.

mod java;
mod other;
mod xml;

use std::collections::HashMap;

pub use java::{AnnotationStrategy, ClassMethodStrategy, FieldStrategy, MethodStrategy, OtherStrategy};
pub use other::{FileStrategy, IgnoreStrategy};
pub use xml::XmlStrategy;

use crate::types::{Kind, RawMatch};

/// File names are unambiguous, so they win every tie.
pub const FILE_PRIORITY: u8 = 0;
/// Noise claims text before anything can read structure into it.
pub const IGNORE_PRIORITY: u8 = 0;
/// Whole XML tags.
pub const XML_PRIORITY: u8 = 1;
/// Qualified calls.
pub const CLASS_METHOD_PRIORITY: u8 = 1;
/// Unqualified calls.
pub const METHOD_PRIORITY: u8 = 2;
/// Member access and constants.
pub const FIELD_PRIORITY: u8 = 2;
/// Annotation names.
pub const ANNOTATION_PRIORITY: u8 = 2;
/// Bare type names and camel-case identifiers.
pub const OTHER_PRIORITY: u8 = 3;

/// Least preferred of the structural strategies.
pub const LOWEST_STRUCTURAL_PRIORITY: u8 = OTHER_PRIORITY;

/// A matcher for one family of code-like text.
///
/// Implementations hold no per-call state and must only report spans that
/// lie on UTF-8 boundaries inside the scanned text.
pub trait Strategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Every candidate found in `text`, in the order it was found.
    fn find_matches(&self, text: &str) -> Vec<RawMatch>;
}

/// Strategy sets keyed by the structural context the text came from.
/// Built once; contexts without a set fall back to the `unknown` set.
pub struct StrategyTable {
    /// Ordered strategies per context kind.
    sets: HashMap<Kind, Vec<Box<dyn Strategy>>>,
}

impl StrategyTable {
    /// A table with no strategies at all.
    pub fn empty() -> Self {
        Self { sets: HashMap::new() }
    }

    /// Register the strategies used for `context`, queried in the given order.
    #[must_use]
    pub fn with(mut self, context: Kind, strategies: Vec<Box<dyn Strategy>>) -> Self {
        self.sets.insert(context, strategies);
        self
    }

    /// Strategies for `context`, or the `unknown` set when none are registered.
    pub fn strategies_for(&self, context: Kind) -> &[Box<dyn Strategy>] {
        self.sets
            .get(&context)
            .or_else(|| self.sets.get(&Kind::Unknown))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Run every strategy registered for `context` and pool their matches in
    /// strategy order.
    pub fn find_matches(&self, context: Kind, text: &str) -> Vec<RawMatch> {
        let mut matches = Vec::new();
        for strategy in self.strategies_for(context) {
            let found = strategy.find_matches(text);
            tracing::trace!(strategy = strategy.name(), count = found.len(), "strategy matches");
            matches.extend(found);
        }
        matches
    }
}

impl Default for StrategyTable {
    /// Method bodies look for calls, class bodies for types and annotations,
    /// and anything else gets the full set.
    fn default() -> Self {
        Self::empty()
            .with(Kind::Unknown, all_strategies())
            .with(
                Kind::Method,
                vec![Box::new(ClassMethodStrategy), Box::new(MethodStrategy)],
            )
            .with(
                Kind::Class,
                vec![Box::new(AnnotationStrategy), Box::new(OtherStrategy)],
            )
    }
}

/// Every strategy, in the order their candidates are pooled.
fn all_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(FileStrategy),
        Box::new(XmlStrategy),
        Box::new(ClassMethodStrategy),
        Box::new(MethodStrategy),
        Box::new(FieldStrategy),
        Box::new(AnnotationStrategy),
        Box::new(OtherStrategy),
        Box::new(IgnoreStrategy::default()),
    ]
}

/// Byte just before `pos`, if any.
fn byte_before(text: &str, pos: usize) -> Option<u8> {
    pos.checked_sub(1).and_then(|p| text.as_bytes().get(p).copied())
}

/// Bytes that continue a Java identifier.
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
