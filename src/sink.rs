//! Persistence boundary: where finished references and snippets go.

use std::io::Write;

use serde::Serialize;

use crate::error::Error;
use crate::snippet::CodeSnippet;
use crate::types::Reference;

/// Identity a sink assigns to a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StoredId(
    /// Sequence number within one sink.
    pub u64,
);

/// Durable storage for extraction results. Objects are handed over one at a
/// time as soon as they are created, so a caller can observe partial progress.
pub trait Sink {
    /// Persist one reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the object could not be stored. The resolver
    /// propagates it unchanged.
    fn store_reference(&mut self, reference: &Reference) -> Result<StoredId, Error>;

    /// Persist one classified snippet.
    ///
    /// # Errors
    ///
    /// Returns an error if the object could not be stored.
    fn store_snippet(&mut self, snippet: &CodeSnippet) -> Result<StoredId, Error>;
}

/// Keeps everything in memory. Ids are sequential across both object types.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Stored references, in store order.
    pub references: Vec<Reference>,
    /// Stored snippets, in store order.
    pub snippets: Vec<CodeSnippet>,
    /// Id for the next stored object.
    next_id: u64,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next id.
    fn next_id(&mut self) -> StoredId {
        let id = StoredId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

impl Sink for MemorySink {
    fn store_reference(&mut self, reference: &Reference) -> Result<StoredId, Error> {
        self.references.push(reference.clone());
        Ok(self.next_id())
    }

    fn store_snippet(&mut self, snippet: &CodeSnippet) -> Result<StoredId, Error> {
        self.snippets.push(snippet.clone());
        Ok(self.next_id())
    }
}

/// Streams every stored object as one JSON document per line.
pub struct JsonLinesSink<W: Write> {
    /// Destination of the lines.
    writer: W,
    /// Objects written so far; also the next id.
    written: u64,
    /// Document the following lines came from.
    source: Option<String>,
}

/// Envelope written for each line, tagged by object type.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Line<'a> {
    /// A stored reference.
    Reference {
        /// Id assigned by the sink.
        id: StoredId,
        /// Document the reference came from.
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<&'a str>,
        /// The reference fields, inlined.
        #[serde(flatten)]
        reference: &'a Reference,
    },
    /// A stored snippet.
    Snippet {
        /// Id assigned by the sink.
        id: StoredId,
        /// Document the snippet came from.
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<&'a str>,
        /// The snippet fields, inlined.
        #[serde(flatten)]
        snippet: &'a CodeSnippet,
    },
}

impl<W: Write> JsonLinesSink<W> {
    /// Sink writing to `writer`, with no source tag yet.
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0, source: None }
    }

    /// Tag every following line with the document it came from.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    /// Number of objects written so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn store_reference(&mut self, reference: &Reference) -> Result<StoredId, Error> {
        let id = StoredId(self.written);
        write_line(&mut self.writer, &Line::Reference { id, source: self.source.as_deref(), reference })?;
        self.written = self.written.saturating_add(1);
        Ok(id)
    }

    fn store_snippet(&mut self, snippet: &CodeSnippet) -> Result<StoredId, Error> {
        let id = StoredId(self.written);
        write_line(&mut self.writer, &Line::Snippet { id, source: self.source.as_deref(), snippet })?;
        self.written = self.written.saturating_add(1);
        Ok(id)
    }
}

/// Write `line` as JSON followed by a newline.
///
/// # Errors
///
/// Returns `Error::Json` or `Error::Io` if the writer fails.
fn write_line<W: Write>(writer: &mut W, line: &Line<'_>) -> Result<(), Error> {
    serde_json::to_writer(&mut *writer, line)?;
    writer.write_all(b"\n")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Notation;
    use crate::types::Kind;

    #[test]
    fn memory_sink_hands_out_sequential_ids() {
        let mut sink = MemorySink::new();
        let a = sink.store_reference(&Reference::new("Foo", Kind::Class, 0..3)).unwrap();
        let b = sink
            .store_snippet(&CodeSnippet { language: Notation::Java, snippet_text: "x;".to_string() })
            .unwrap();
        assert_eq!((a, b), (StoredId(0), StoredId(1)));
        assert_eq!(sink.references.len(), 1);
        assert_eq!(sink.snippets.len(), 1);
    }

    #[test]
    fn json_lines_are_tagged_and_flattened() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.store_reference(&Reference::new("Foo", Kind::Class, 4..7)).unwrap();
        assert_eq!(sink.written(), 1);
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["type"], "reference");
        assert_eq!(value["id"], 0);
        assert_eq!(value["content"], "Foo");
        assert_eq!(value["kind_hint"], "class");
        assert_eq!(value["span"]["start"], 4);
        assert!(value.get("parent_reference").is_none());
        assert!(value.get("source").is_none());
    }

    #[test]
    fn lines_carry_the_current_source() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.set_source("docs/guide.md");
        sink.store_snippet(&CodeSnippet { language: Notation::Xml, snippet_text: "<a/>".to_string() })
            .unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["type"], "snippet");
        assert_eq!(value["source"], "docs/guide.md");
        assert_eq!(value["language"], "xml");
    }
}
