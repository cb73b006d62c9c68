//! Child-kind to parent-kind table used to attach child references to the
//! reference that structurally owns them.

use std::collections::HashMap;

use crate::types::{Kind, Reference};

/// Maps a child kind to the kind of reference expected to contain it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindHierarchy {
    /// Parent kind per child kind.
    parents: HashMap<Kind, Kind>,
}

impl KindHierarchy {
    /// A table with no entries; no child is ever attached.
    pub fn empty() -> Self {
        Self { parents: HashMap::new() }
    }

    /// Java members under their type, parameters under their method.
    pub fn java() -> Self {
        Self::empty()
            .with(Kind::Field, Kind::Class)
            .with(Kind::Method, Kind::Class)
            .with(Kind::MethodParameter, Kind::Method)
    }

    /// XML attributes under their element, values under their attribute.
    pub fn xml() -> Self {
        Self::empty()
            .with(Kind::XmlAttribute, Kind::XmlElement)
            .with(Kind::XmlAttributeValue, Kind::XmlAttribute)
    }

    /// Add or replace the parent kind for `child`.
    #[must_use]
    pub fn with(mut self, child: Kind, parent: Kind) -> Self {
        self.parents.insert(child, parent);
        self
    }

    /// Merge every entry of `other` into this table; `other` wins on conflicts.
    #[must_use]
    pub fn merged(mut self, other: &Self) -> Self {
        self.parents.extend(other.parents.iter().map(|(c, p)| (*c, *p)));
        self
    }

    /// Declared parent kind of `child`.
    pub fn parent_of(&self, child: Kind) -> Option<Kind> {
        self.parents.get(&child).copied()
    }

    /// Position of the most recently accepted reference whose kind is the
    /// declared parent of `child`. `None` when the kind has no entry or no
    /// such reference was accepted yet.
    pub fn find_parent_reference(&self, child: Kind, accepted: &[Reference]) -> Option<usize> {
        let parent_kind = self.parent_of(child)?;
        accepted.iter().rposition(|r| r.kind_hint == parent_kind)
    }
}

impl Default for KindHierarchy {
    /// Java and XML hierarchies combined.
    fn default() -> Self {
        Self::java().merged(&Self::xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(content: &str, kind: Kind) -> Reference {
        Reference::new(content, kind, 0..content.len())
    }

    #[test]
    fn default_covers_java_and_xml() {
        let h = KindHierarchy::default();
        assert_eq!(h.parent_of(Kind::Field), Some(Kind::Class));
        assert_eq!(h.parent_of(Kind::Method), Some(Kind::Class));
        assert_eq!(h.parent_of(Kind::MethodParameter), Some(Kind::Method));
        assert_eq!(h.parent_of(Kind::XmlAttribute), Some(Kind::XmlElement));
        assert_eq!(h.parent_of(Kind::XmlAttributeValue), Some(Kind::XmlAttribute));
        assert_eq!(h.parent_of(Kind::Class), None);
    }

    #[test]
    fn nearest_parent_is_the_most_recent_match() {
        let accepted = vec![
            reference("Foo", Kind::Class),
            reference("run", Kind::Method),
            reference("Bar", Kind::Class),
        ];
        let h = KindHierarchy::default();
        assert_eq!(h.find_parent_reference(Kind::Field, &accepted), Some(2));
        assert_eq!(h.find_parent_reference(Kind::MethodParameter, &accepted), Some(1));
    }

    #[test]
    fn missing_entry_or_parent_yields_none() {
        let accepted = vec![reference("Foo", Kind::Class)];
        let h = KindHierarchy::default();
        assert_eq!(h.find_parent_reference(Kind::Annotation, &accepted), None);
        assert_eq!(h.find_parent_reference(Kind::XmlAttribute, &accepted), None);
    }

    #[test]
    fn overrides_replace_defaults() {
        let h = KindHierarchy::default().with(Kind::Field, Kind::Enumeration);
        assert_eq!(h.parent_of(Kind::Field), Some(Kind::Enumeration));
    }
}
